//! The full encoding of one candidate solution.

use super::types::Chromosome;
use crate::error::EncodingError;
use crate::random::EvolveRng;

/// An ordered, non-empty sequence of valid chromosomes.
///
/// Equality is structural. A genotype also serves as a *template*:
/// [`new_instance`](Genotype::new_instance) produces a fresh random genotype
/// with the same shape, which is how the engine seeds its population.
///
/// ```
/// use u_evolve::genetic::{BitChromosome, Genotype};
/// use u_evolve::random::create_rng;
///
/// let template = Genotype::new(vec![BitChromosome::new(10, 0.5).unwrap()]).unwrap();
/// let mut rng = create_rng(42);
/// let individual = template.new_instance(&mut rng);
/// assert_eq!(individual.gene_count(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Genotype<C: Chromosome> {
    chromosomes: Vec<C>,
}

impl<C: Chromosome> Genotype<C> {
    /// Creates a genotype, validating every chromosome.
    pub fn new(chromosomes: Vec<C>) -> Result<Self, EncodingError> {
        if chromosomes.is_empty() {
            return Err(EncodingError::EmptyGenotype);
        }
        if let Some(index) = chromosomes.iter().position(|c| !c.is_valid()) {
            return Err(EncodingError::InvalidChromosome { index });
        }
        Ok(Genotype { chromosomes })
    }

    /// Creates a new random genotype of the same shape.
    ///
    /// Chromosomes are regenerated in order.
    pub fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        Genotype {
            chromosomes: self.chromosomes.iter().map(|c| c.new_instance(rng)).collect(),
        }
    }

    /// Returns a copy with the chromosome at `index` replaced.
    pub fn with_chromosome(&self, index: usize, chromosome: C) -> Result<Self, EncodingError> {
        if index >= self.chromosomes.len() {
            return Err(EncodingError::IndexOutOfRange {
                index,
                length: self.chromosomes.len(),
            });
        }
        if !chromosome.is_valid() {
            return Err(EncodingError::InvalidChromosome { index });
        }
        let mut chromosomes = self.chromosomes.clone();
        chromosomes[index] = chromosome;
        Ok(Genotype { chromosomes })
    }

    pub fn chromosomes(&self) -> &[C] {
        &self.chromosomes
    }

    /// The first chromosome. Always present.
    pub fn first(&self) -> &C {
        &self.chromosomes[0]
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.chromosomes.get(index)
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Total number of genes across all chromosomes.
    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::len).sum()
    }

    pub fn is_valid(&self) -> bool {
        !self.chromosomes.is_empty() && self.chromosomes.iter().all(Chromosome::is_valid)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.chromosomes.iter()
    }
}

impl<'a, C: Chromosome> IntoIterator for &'a Genotype<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}
