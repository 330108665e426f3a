//! Individuals and generations.

use super::genotype::Genotype;
use super::types::Chromosome;
use crate::engine::{Fitness, Optimize};
use std::sync::Arc;

/// A genotype bound to its generation of birth and, once evaluated, its
/// fitness.
///
/// The genotype is shared immutably, so selecting the same parent several
/// times never copies or aliases mutable state. Fitness is assigned at most
/// once: evaluation builds a new phenotype instead of modifying this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenotype<C: Chromosome, F> {
    genotype: Arc<Genotype<C>>,
    generation: u64,
    fitness: Option<F>,
}

impl<C: Chromosome, F: Copy> Phenotype<C, F> {
    /// Creates an unevaluated phenotype.
    pub fn new(genotype: Genotype<C>, generation: u64) -> Self {
        Self::shared(Arc::new(genotype), generation)
    }

    /// Creates an unevaluated phenotype around an already shared genotype.
    pub fn shared(genotype: Arc<Genotype<C>>, generation: u64) -> Self {
        Phenotype {
            genotype,
            generation,
            fitness: None,
        }
    }

    /// Restores an evaluated phenotype, e.g. from a stored population.
    pub fn with_fitness(genotype: Genotype<C>, generation: u64, fitness: F) -> Self {
        Phenotype {
            genotype: Arc::new(genotype),
            generation,
            fitness: Some(fitness),
        }
    }

    pub fn genotype(&self) -> &Genotype<C> {
        &self.genotype
    }

    /// Generation in which this phenotype was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of generations this phenotype has lived at `current`.
    pub fn age(&self, current: u64) -> u64 {
        current.saturating_sub(self.generation)
    }

    pub fn fitness(&self) -> Option<F> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Returns an evaluated copy. Already evaluated phenotypes are returned
    /// unchanged.
    pub(crate) fn evaluated(&self, fitness: F) -> Self {
        if self.fitness.is_some() {
            return self.clone();
        }
        Phenotype {
            genotype: Arc::clone(&self.genotype),
            generation: self.generation,
            fitness: Some(fitness),
        }
    }
}

/// The ordered phenotypes of exactly one generation.
///
/// Each stage of a generation produces a new `Population`; none is modified
/// after being handed on.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<C: Chromosome, F> {
    phenotypes: Vec<Phenotype<C, F>>,
}

impl<C: Chromosome, F: Copy> Population<C, F> {
    pub fn new(phenotypes: Vec<Phenotype<C, F>>) -> Self {
        Population { phenotypes }
    }

    pub fn len(&self) -> usize {
        self.phenotypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phenotypes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Phenotype<C, F>> {
        self.phenotypes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phenotype<C, F>> {
        self.phenotypes.iter()
    }

    pub fn as_slice(&self) -> &[Phenotype<C, F>] {
        &self.phenotypes
    }

    pub fn into_vec(self) -> Vec<Phenotype<C, F>> {
        self.phenotypes
    }

    /// Returns `true` if every phenotype carries a fitness value.
    pub fn is_evaluated(&self) -> bool {
        self.phenotypes.iter().all(Phenotype::is_evaluated)
    }

    /// Appends `other` after `self`.
    pub fn concat(self, other: Population<C, F>) -> Self {
        let mut phenotypes = self.phenotypes;
        phenotypes.extend(other.phenotypes);
        Population { phenotypes }
    }
}

impl<C: Chromosome, F: Fitness> Population<C, F> {
    /// The best evaluated phenotype under `optimize`. The first one wins ties.
    pub fn best(&self, optimize: Optimize) -> Option<&Phenotype<C, F>> {
        self.phenotypes
            .iter()
            .filter(|p| p.is_evaluated())
            .fold(None, |best: Option<&Phenotype<C, F>>, p| match best {
                Some(b) if !optimize.is_better(p.fitness(), b.fitness()) => Some(b),
                _ => Some(p),
            })
    }
}

impl<C: Chromosome, F: Copy> From<Vec<Phenotype<C, F>>> for Population<C, F> {
    fn from(phenotypes: Vec<Phenotype<C, F>>) -> Self {
        Population::new(phenotypes)
    }
}

impl<C: Chromosome, F: Copy> FromIterator<Phenotype<C, F>> for Population<C, F> {
    fn from_iter<T: IntoIterator<Item = Phenotype<C, F>>>(iter: T) -> Self {
        Population::new(iter.into_iter().collect())
    }
}

impl<C: Chromosome, F> IntoIterator for Population<C, F> {
    type Item = Phenotype<C, F>;
    type IntoIter = std::vec::IntoIter<Phenotype<C, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.phenotypes.into_iter()
    }
}

impl<'a, C: Chromosome, F> IntoIterator for &'a Population<C, F> {
    type Item = &'a Phenotype<C, F>;
    type IntoIter = std::slice::Iter<'a, Phenotype<C, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.phenotypes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::BitChromosome;

    fn genotype(bits: &[bool]) -> Genotype<BitChromosome> {
        Genotype::new(vec![BitChromosome::of(bits).unwrap()]).unwrap()
    }

    #[test]
    fn test_fitness_assigned_once() {
        let p: Phenotype<BitChromosome, f64> = Phenotype::new(genotype(&[true]), 0);
        assert!(!p.is_evaluated());
        let e = p.evaluated(1.0);
        assert_eq!(e.fitness(), Some(1.0));
        assert_eq!(p.fitness(), None);
        let again = e.evaluated(5.0);
        assert_eq!(again.fitness(), Some(1.0));
    }

    #[test]
    fn test_age() {
        let p: Phenotype<BitChromosome, f64> = Phenotype::new(genotype(&[true]), 3);
        assert_eq!(p.age(10), 7);
        assert_eq!(p.age(1), 0);
    }

    #[test]
    fn test_best_respects_direction_and_ties() {
        let pop: Population<BitChromosome, i32> = vec![
            Phenotype::with_fitness(genotype(&[true]), 0, 3),
            Phenotype::with_fitness(genotype(&[false]), 0, 7),
            Phenotype::with_fitness(genotype(&[true, true]), 0, 7),
            Phenotype::new(genotype(&[false, true]), 0),
        ]
        .into();
        let max = pop.best(Optimize::Maximum).unwrap();
        assert_eq!(max.genotype(), &genotype(&[false]));
        assert_eq!(pop.best(Optimize::Minimum).unwrap().fitness(), Some(3));
        assert!(!pop.is_evaluated());
    }
}
