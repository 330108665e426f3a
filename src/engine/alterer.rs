//! Alteration strategies: mutation, recombination, and composition.
//!
//! An [`Alterer`] turns the offspring population into a new population and
//! reports how many genes it changed. Changed individuals become fresh,
//! unevaluated phenotypes born in the current generation; unchanged ones are
//! passed through with their fitness intact.
//!
//! Every strategy keeps its output valid. Positional crossovers on encodings
//! with cross-gene constraints (permutations) would break them, so such
//! children are rejected and the parents kept; use the dedicated
//! permutation crossovers instead.
//!
//! # Random draws
//!
//! Recombination walks the population in order. For each index `i` it draws
//! the recombination probability; on success it draws the mate `j != i`,
//! then the chromosome index, then the operator's own points.

use super::config::check_probability;
use super::operators::{cycle_crossover, invert_segment, order_crossover, pmx_crossover};
use super::types::Fitness;
use crate::error::ConfigError;
use crate::genetic::{Chromosome, Genotype, Mean, PermutationChromosome, Phenotype, Population};
use crate::random::EvolveRng;
use log::trace;
use rand::seq::index::sample;
use rand::Rng;

/// Output of one alteration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AltererResult<C: Chromosome, F> {
    pub population: Population<C, F>,
    /// Number of genes whose value changed.
    pub alterations: usize,
}

/// Transforms a population of offspring.
pub trait Alterer<C: Chromosome, F: Fitness>: Send + Sync {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F>;

    /// Checks the alterer's parameters.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Number of positions at which `a` and `b` hold different genes.
fn differing<C: Chromosome>(a: &C, b: &C) -> usize {
    a.genes().iter().zip(b.genes()).filter(|(x, y)| x != y).count()
}

/// Replaces chromosome `index` of `phenotype` if `chromosome` differs from it.
///
/// Returns the number of altered genes.
fn replace<C: Chromosome, F: Fitness>(
    phenotype: &mut Phenotype<C, F>,
    index: usize,
    chromosome: C,
    generation: u64,
) -> usize {
    let Some(current) = phenotype.genotype().get(index) else {
        return 0;
    };
    let altered = differing(current, &chromosome);
    if altered == 0 {
        return 0;
    }
    match phenotype.genotype().with_chromosome(index, chromosome) {
        Ok(genotype) => {
            *phenotype = Phenotype::new(genotype, generation);
            altered
        }
        Err(e) => {
            trace!("rejected altered chromosome {index}: {e}");
            0
        }
    }
}

/// Applies `op` to every chromosome of every phenotype, in order.
///
/// `op` returns the replacement chromosome, or `None` to keep the original.
fn per_chromosome<C, F, Op>(
    population: &Population<C, F>,
    generation: u64,
    rng: &mut EvolveRng,
    mut op: Op,
) -> AltererResult<C, F>
where
    C: Chromosome,
    F: Fitness,
    Op: FnMut(&C, &mut EvolveRng) -> Option<C>,
{
    let mut alterations = 0;
    let phenotypes = population
        .iter()
        .map(|phenotype| {
            let mut chromosomes: Vec<C> = phenotype.genotype().chromosomes().to_vec();
            let mut altered = 0;
            for chromosome in chromosomes.iter_mut() {
                if let Some(next) = op(chromosome, rng) {
                    altered += differing(chromosome, &next);
                    *chromosome = next;
                }
            }
            if altered == 0 {
                return phenotype.clone();
            }
            match Genotype::new(chromosomes) {
                Ok(genotype) => {
                    alterations += altered;
                    Phenotype::new(genotype, generation)
                }
                Err(e) => {
                    trace!("rejected altered genotype: {e}");
                    phenotype.clone()
                }
            }
        })
        .collect();
    AltererResult {
        population: phenotypes,
        alterations,
    }
}

/// Pairs individuals and recombines one chromosome of each pair.
///
/// `op` returns both children, or `None` if recombination is impossible for
/// these parents.
fn recombine<C, F, Op>(
    population: &Population<C, F>,
    generation: u64,
    probability: f64,
    rng: &mut EvolveRng,
    mut op: Op,
) -> AltererResult<C, F>
where
    C: Chromosome,
    F: Fitness,
    Op: FnMut(&C, &C, &mut EvolveRng) -> Option<(C, C)>,
{
    let mut phenotypes: Vec<Phenotype<C, F>> = population.iter().cloned().collect();
    let n = phenotypes.len();
    if n < 2 {
        return AltererResult {
            population: phenotypes.into(),
            alterations: 0,
        };
    }

    let mut alterations = 0;
    for i in 0..n {
        if rng.random::<f64>() >= probability {
            continue;
        }
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let chromosomes = phenotypes[i].genotype().len().min(phenotypes[j].genotype().len());
        let index = rng.random_range(0..chromosomes);

        let (Some(a), Some(b)) = (
            phenotypes[i].genotype().get(index),
            phenotypes[j].genotype().get(index),
        ) else {
            continue;
        };
        if a.len() != b.len() {
            trace!("skipping recombination of chromosomes with different lengths");
            continue;
        }
        let Some((child_a, child_b)) = op(a, b, rng) else {
            trace!("recombination of {i} and {j} rejected");
            continue;
        };
        alterations += replace(&mut phenotypes[i], index, child_a, generation);
        alterations += replace(&mut phenotypes[j], index, child_b, generation);
    }

    AltererResult {
        population: phenotypes.into(),
        alterations,
    }
}

/// Builds a chromosome like `template` from `genes`, or `None` if the
/// representation rejects them.
fn rebuild<C: Chromosome>(template: &C, genes: Vec<C::Gene>) -> Option<C> {
    template.with_genes(genes).ok()
}

/// Per-gene mutation through [`Chromosome::mutate`].
///
/// Each representation decides what a mutated gene is: a flipped bit, a new
/// value from the domain, or a swap for permutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutator {
    probability: f64,
}

impl Mutator {
    pub fn new(probability: f64) -> Self {
        Mutator { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Mutator { probability: 0.01 }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for Mutator {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        per_chromosome(population, generation, rng, |chromosome, rng| {
            chromosome
                .mutate(self.probability, rng)
                .map(|(mutated, _)| mutated)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("mutation", self.probability)
    }
}

/// Swaps each gene, with `probability`, with another gene of the same
/// chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapMutator {
    probability: f64,
}

impl SwapMutator {
    pub fn new(probability: f64) -> Self {
        SwapMutator { probability }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for SwapMutator {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        per_chromosome(population, generation, rng, |chromosome, rng| {
            let n = chromosome.len();
            if n < 2 {
                return None;
            }
            let mut genes = chromosome.genes().to_vec();
            for i in 0..n {
                if rng.random::<f64>() < self.probability {
                    let j = rng.random_range(0..n);
                    genes.swap(i, j);
                }
            }
            rebuild(chromosome, genes)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("swap", self.probability)
    }
}

/// Reverses a random segment of a chromosome.
///
/// One draw per chromosome. Reversal only reorders genes, so it is valid for
/// every representation including permutations (a 2-opt move).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversionMutator {
    probability: f64,
}

impl InversionMutator {
    pub fn new(probability: f64) -> Self {
        InversionMutator { probability }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for InversionMutator {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        per_chromosome(population, generation, rng, |chromosome, rng| {
            if rng.random::<f64>() >= self.probability {
                return None;
            }
            let mut genes = chromosome.genes().to_vec();
            invert_segment(&mut genes, rng)?;
            rebuild(chromosome, genes)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("inversion", self.probability)
    }
}

/// Exchanges the genes after one random cut point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    pub fn new(probability: f64) -> Self {
        SinglePointCrossover { probability }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for SinglePointCrossover {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        recombine(population, generation, self.probability, rng, |a, b, rng| {
            if a.len() < 2 {
                return None;
            }
            let point = rng.random_range(1..a.len());
            exchange(a, b, &[point])
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("crossover", self.probability)
    }
}

/// Exchanges alternating segments between `points` random cut points.
///
/// Uses fewer points when the chromosome is too short.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiPointCrossover {
    probability: f64,
    points: usize,
}

impl MultiPointCrossover {
    pub fn new(probability: f64, points: usize) -> Self {
        MultiPointCrossover {
            probability,
            points,
        }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for MultiPointCrossover {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        recombine(population, generation, self.probability, rng, |a, b, rng| {
            let n = a.len();
            if n < 2 {
                return None;
            }
            let mut points: Vec<usize> = sample(rng, n - 1, self.points.min(n - 1))
                .into_iter()
                .map(|p| p + 1)
                .collect();
            points.sort_unstable();
            exchange(a, b, &points)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.points == 0 {
            return Err(ConfigError::CrossoverPoints);
        }
        check_probability("crossover", self.probability)
    }
}

/// Swaps every other segment between ascending cut `points`.
fn exchange<C: Chromosome>(a: &C, b: &C, points: &[usize]) -> Option<(C, C)> {
    let mut genes_a = a.genes().to_vec();
    let mut genes_b = b.genes().to_vec();
    let n = genes_a.len();
    let mut bounds = points.iter().copied().chain(std::iter::once(n));
    let mut start = bounds.next()?;
    let mut swap = true;
    for end in bounds {
        if swap {
            genes_a[start..end].swap_with_slice(&mut genes_b[start..end]);
        }
        swap = !swap;
        start = end;
    }
    Some((rebuild(a, genes_a)?, rebuild(b, genes_b)?))
}

/// Arithmetic recombination: the first parent's genes become the mean of
/// both parents' genes. The mate is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanAlterer {
    probability: f64,
}

impl MeanAlterer {
    pub fn new(probability: f64) -> Self {
        MeanAlterer { probability }
    }
}

impl<C, F> Alterer<C, F> for MeanAlterer
where
    C: Chromosome,
    C::Gene: Mean,
    F: Fitness,
{
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        recombine(population, generation, self.probability, rng, |a, b, _| {
            let genes = a.genes().iter().zip(b.genes()).map(|(x, y)| x.mean(y)).collect();
            Some((rebuild(a, genes)?, b.clone()))
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("mean", self.probability)
    }
}

/// Wraps an index-level permutation crossover as an alterer.
fn permutation_pair<R>(
    a: &PermutationChromosome,
    b: &PermutationChromosome,
    rng: &mut R,
    op: fn(&[usize], &[usize], &mut R) -> (Vec<usize>, Vec<usize>),
) -> Option<(PermutationChromosome, PermutationChromosome)> {
    let (x, y) = op(&a.indices(), &b.indices(), rng);
    Some((
        PermutationChromosome::of(&x).ok()?,
        PermutationChromosome::of(&y).ok()?,
    ))
}

/// Partially matched crossover (PMX) for permutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartiallyMatchedCrossover {
    probability: f64,
}

impl PartiallyMatchedCrossover {
    pub fn new(probability: f64) -> Self {
        PartiallyMatchedCrossover { probability }
    }
}

impl<F: Fitness> Alterer<PermutationChromosome, F> for PartiallyMatchedCrossover {
    fn alter(
        &self,
        population: &Population<PermutationChromosome, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<PermutationChromosome, F> {
        recombine(population, generation, self.probability, rng, |a, b, rng| {
            permutation_pair(a, b, rng, pmx_crossover)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("crossover", self.probability)
    }
}

/// Order crossover (OX) for permutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCrossover {
    probability: f64,
}

impl OrderCrossover {
    pub fn new(probability: f64) -> Self {
        OrderCrossover { probability }
    }
}

impl<F: Fitness> Alterer<PermutationChromosome, F> for OrderCrossover {
    fn alter(
        &self,
        population: &Population<PermutationChromosome, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<PermutationChromosome, F> {
        recombine(population, generation, self.probability, rng, |a, b, rng| {
            permutation_pair(a, b, rng, order_crossover)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("crossover", self.probability)
    }
}

/// Cycle crossover (CX) for permutations. Draws no recombination points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleCrossover {
    probability: f64,
}

impl CycleCrossover {
    pub fn new(probability: f64) -> Self {
        CycleCrossover { probability }
    }
}

impl<F: Fitness> Alterer<PermutationChromosome, F> for CycleCrossover {
    fn alter(
        &self,
        population: &Population<PermutationChromosome, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<PermutationChromosome, F> {
        recombine(population, generation, self.probability, rng, |a, b, _| {
            let (x, y) = cycle_crossover(&a.indices(), &b.indices());
            Some((
                PermutationChromosome::of(&x).ok()?,
                PermutationChromosome::of(&y).ok()?,
            ))
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("crossover", self.probability)
    }
}

/// Applies several alterers in order and sums their counts.
pub struct CompositeAlterer<C: Chromosome, F: Fitness> {
    alterers: Vec<Box<dyn Alterer<C, F>>>,
}

impl<C: Chromosome, F: Fitness> CompositeAlterer<C, F> {
    pub fn new(alterers: Vec<Box<dyn Alterer<C, F>>>) -> Self {
        CompositeAlterer { alterers }
    }

    /// Appends `alterer` to the pipeline.
    pub fn then<A: Alterer<C, F> + 'static>(mut self, alterer: A) -> Self {
        self.alterers.push(Box::new(alterer));
        self
    }

    pub fn len(&self) -> usize {
        self.alterers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alterers.is_empty()
    }
}

impl<C: Chromosome, F: Fitness> Default for CompositeAlterer<C, F> {
    fn default() -> Self {
        CompositeAlterer::new(Vec::new())
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for CompositeAlterer<C, F> {
    fn alter(
        &self,
        population: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> AltererResult<C, F> {
        let mut result = AltererResult {
            population: population.clone(),
            alterations: 0,
        };
        for alterer in &self.alterers {
            let step = alterer.alter(&result.population, generation, rng);
            result.population = step.population;
            result.alterations += step.alterations;
        }
        result
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.alterers.iter().try_for_each(|a| a.validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::{BitChromosome, DoubleChromosome, IntegerChromosome};
    use crate::random::create_rng;

    fn bit_population(n: usize, len: usize, seed: u64) -> Population<BitChromosome, usize> {
        let mut rng = create_rng(seed);
        let template = Genotype::new(vec![BitChromosome::new(len, 0.5).unwrap()]).unwrap();
        (0..n)
            .map(|_| Phenotype::with_fitness(template.new_instance(&mut rng), 0, 0))
            .collect()
    }

    fn perm_population(n: usize, len: usize, seed: u64) -> Population<PermutationChromosome, f64> {
        let mut rng = create_rng(seed);
        (0..n)
            .map(|_| {
                let c = PermutationChromosome::random(len, &mut rng).unwrap();
                Phenotype::new(Genotype::new(vec![c]).unwrap(), 0)
            })
            .collect()
    }

    fn total_differing<C: Chromosome, F: Fitness>(
        before: &Population<C, F>,
        after: &Population<C, F>,
    ) -> usize {
        before
            .iter()
            .zip(after.iter())
            .map(|(a, b)| {
                a.genotype()
                    .iter()
                    .zip(b.genotype().iter())
                    .map(|(x, y)| differing(x, y))
                    .sum::<usize>()
            })
            .sum()
    }

    #[test]
    fn test_mutator_counts_changed_genes() {
        let population = bit_population(20, 16, 1);
        let mut rng = create_rng(42);
        let result = Alterer::<BitChromosome, usize>::alter(&Mutator::new(0.1), &population, 3, &mut rng);

        assert_eq!(result.population.len(), 20);
        assert!(result.alterations > 0);
        assert_eq!(result.alterations, total_differing(&population, &result.population));
        for (before, after) in population.iter().zip(result.population.iter()) {
            if before.genotype() == after.genotype() {
                assert_eq!(after.fitness(), Some(0), "unchanged keeps fitness");
            } else {
                assert_eq!(after.fitness(), None);
                assert_eq!(after.generation(), 3);
            }
        }
    }

    #[test]
    fn test_zero_probability_is_identity() {
        let population = bit_population(10, 8, 2);
        let mut rng = create_rng(42);
        let alterers: Vec<Box<dyn Alterer<BitChromosome, usize>>> = vec![
            Box::new(Mutator::new(0.0)),
            Box::new(SwapMutator::new(0.0)),
            Box::new(InversionMutator::new(0.0)),
            Box::new(SinglePointCrossover::new(0.0)),
            Box::new(MultiPointCrossover::new(0.0, 2)),
        ];
        for alterer in alterers {
            let result = alterer.alter(&population, 1, &mut rng);
            assert_eq!(result.alterations, 0);
            assert_eq!(result.population, population);
        }
    }

    #[test]
    fn test_single_point_crossover_preserves_genes() {
        let population = bit_population(30, 12, 3);
        let mut rng = create_rng(42);
        let result = Alterer::<BitChromosome, usize>::alter(
            &SinglePointCrossover::new(1.0),
            &population,
            1,
            &mut rng,
        );
        assert!(result.alterations > 0);
        // Crossover only moves genes between individuals at the same position.
        for position in 0..12 {
            let ones = |pop: &Population<BitChromosome, usize>| {
                pop.iter()
                    .filter(|p| p.genotype().first().genes()[position].bit())
                    .count()
            };
            assert_eq!(ones(&population), ones(&result.population));
        }
        assert!(result.population.iter().all(|p| p.genotype().first().len() == 12));
    }

    #[test]
    fn test_exchange_segments() {
        let a = IntegerChromosome::of(0, 9, &[0, 0, 0, 0, 0, 0]).unwrap();
        let b = IntegerChromosome::of(0, 9, &[1, 1, 1, 1, 1, 1]).unwrap();
        let (x, y) = exchange(&a, &b, &[2, 4]).unwrap();
        assert_eq!(x.values(), vec![0, 0, 1, 1, 0, 0]);
        assert_eq!(y.values(), vec![1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_positional_crossover_rejects_broken_permutations() {
        let population = perm_population(20, 8, 4);
        let mut rng = create_rng(42);
        let result = Alterer::<PermutationChromosome, f64>::alter(
            &MultiPointCrossover::new(1.0, 3),
            &population,
            1,
            &mut rng,
        );
        assert!(result.population.iter().all(|p| p.genotype().is_valid()));
    }

    #[test]
    fn test_permutation_crossovers_stay_bijective() {
        let population = perm_population(30, 10, 5);
        let alterers: Vec<Box<dyn Alterer<PermutationChromosome, f64>>> = vec![
            Box::new(PartiallyMatchedCrossover::new(1.0)),
            Box::new(OrderCrossover::new(1.0)),
            Box::new(CycleCrossover::new(1.0)),
            Box::new(SwapMutator::new(0.3)),
            Box::new(InversionMutator::new(1.0)),
            Box::new(Mutator::new(0.2)),
        ];
        let mut rng = create_rng(42);
        for alterer in alterers {
            let result = alterer.alter(&population, 1, &mut rng);
            assert!(result.alterations > 0);
            for p in result.population.iter() {
                assert!(p.genotype().first().is_valid());
                assert_eq!(p.genotype().first().len(), 10);
            }
        }
    }

    #[test]
    fn test_mean_alterer_stays_in_domain() {
        let mut rng = create_rng(6);
        let template = Genotype::new(vec![DoubleChromosome::new(-1.0, 1.0, 5).unwrap()]).unwrap();
        let population: Population<DoubleChromosome, f64> = (0..10)
            .map(|_| Phenotype::new(template.new_instance(&mut rng), 0))
            .collect();

        let result = Alterer::<DoubleChromosome, f64>::alter(
            &MeanAlterer::new(1.0),
            &population,
            1,
            &mut rng,
        );
        assert!(result.alterations > 0);
        assert!(result.population.iter().all(|p| p.genotype().is_valid()));
    }

    #[test]
    fn test_composite_sums_counts() {
        let population = bit_population(20, 10, 7);
        let composite = CompositeAlterer::default()
            .then(SinglePointCrossover::new(0.5))
            .then(Mutator::new(0.1));
        assert_eq!(composite.len(), 2);

        let mut rng = create_rng(42);
        let combined = composite.alter(&population, 1, &mut rng);

        let mut rng = create_rng(42);
        let first = Alterer::<BitChromosome, usize>::alter(
            &SinglePointCrossover::new(0.5),
            &population,
            1,
            &mut rng,
        );
        let second = Alterer::<BitChromosome, usize>::alter(
            &Mutator::new(0.1),
            &first.population,
            1,
            &mut rng,
        );
        assert_eq!(combined.population, second.population);
        assert_eq!(combined.alterations, first.alterations + second.alterations);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let population = perm_population(20, 12, 8);
        let alterer: CompositeAlterer<PermutationChromosome, f64> = CompositeAlterer::default()
            .then(PartiallyMatchedCrossover::new(0.6))
            .then(SwapMutator::new(0.05));
        let a = alterer.alter(&population, 1, &mut create_rng(9));
        let b = alterer.alter(&population, 1, &mut create_rng(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_individual_not_recombined() {
        let population = bit_population(1, 8, 10);
        let mut rng = create_rng(42);
        let result = Alterer::<BitChromosome, usize>::alter(
            &SinglePointCrossover::new(1.0),
            &population,
            1,
            &mut rng,
        );
        assert_eq!(result.alterations, 0);
        assert_eq!(result.population, population);
    }

    #[test]
    fn test_validate_probabilities() {
        assert!(Alterer::<BitChromosome, usize>::validate(&Mutator::new(1.5)).is_err());
        assert!(Alterer::<BitChromosome, usize>::validate(&SinglePointCrossover::new(-0.1)).is_err());
        assert_eq!(
            Alterer::<BitChromosome, usize>::validate(&MultiPointCrossover::new(0.5, 0)),
            Err(ConfigError::CrossoverPoints)
        );
        let composite: CompositeAlterer<BitChromosome, usize> = CompositeAlterer::default()
            .then(Mutator::new(0.1))
            .then(SwapMutator::new(2.0));
        assert!(composite.validate().is_err());
    }
}
