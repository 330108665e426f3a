//! Selection strategies.
//!
//! A selector draws `count` phenotypes **with replacement** from a population.
//! Selected phenotypes share their genotype with the source population, which
//! is safe because genotypes are immutable.
//!
//! Every selector is deterministic for a fixed random source and population
//! order.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"

use super::types::{Fitness, Optimize};
use crate::error::ConfigError;
use crate::genetic::{Chromosome, Population};
use crate::random::EvolveRng;
use rand::Rng;

/// Chooses parents or survivors from a population.
pub trait Selector<C: Chromosome, F: Fitness>: Send + Sync {
    /// Selects `count` phenotypes from `population`.
    ///
    /// Returns an empty population if `population` is empty or `count` is 0.
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut EvolveRng,
    ) -> Population<C, F>;

    /// Checks the selector's parameters.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Deterministic top-`count` selection.
///
/// Ties keep their population order. If `count` exceeds the population size
/// the ranking is repeated from the top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TruncationSelector;

impl TruncationSelector {
    pub fn new() -> Self {
        TruncationSelector
    }
}

/// Population indices ordered best first; stable for ties.
fn ranked<C: Chromosome, F: Fitness>(population: &Population<C, F>, optimize: Optimize) -> Vec<usize> {
    let pop = population.as_slice();
    let mut order: Vec<usize> = (0..pop.len()).collect();
    order.sort_by(|&a, &b| optimize.compare_option(pop[b].fitness(), pop[a].fitness()));
    order
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for TruncationSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        _rng: &mut EvolveRng,
    ) -> Population<C, F> {
        if population.is_empty() {
            return Population::new(Vec::new());
        }
        let pop = population.as_slice();
        let order = ranked(population, optimize);
        (0..count).map(|i| pop[order[i % order.len()]].clone()).collect()
    }
}

/// Tournament selection: pick `k` individuals uniformly at random, keep the
/// best. Repeated independently `count` times.
///
/// Higher `k` = stronger selection pressure.
/// - k=2: light pressure (good for diversity)
/// - k=3-5: moderate pressure (typical default)
/// - k>5: strong pressure (risk of premature convergence)
///
/// The first drawn contestant wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelector {
    size: usize,
}

impl TournamentSelector {
    pub fn new(size: usize) -> Self {
        TournamentSelector { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        TournamentSelector { size: 3 }
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for TournamentSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut EvolveRng,
    ) -> Population<C, F> {
        let pop = population.as_slice();
        let n = pop.len();
        if n == 0 {
            return Population::new(Vec::new());
        }
        (0..count)
            .map(|_| {
                let mut best = rng.random_range(0..n);
                for _ in 1..self.size {
                    let idx = rng.random_range(0..n);
                    if optimize.is_better(pop[idx].fitness(), pop[best].fitness()) {
                        best = idx;
                    }
                }
                pop[best].clone()
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::TournamentSize);
        }
        Ok(())
    }
}

/// Non-negative selection weights derived from fitness.
///
/// - maximizing: raw fitness, shifted by `-min` when any value is negative
/// - minimizing: `max - fitness`, so the best individual weighs most
///
/// Unevaluated or non-finite fitness gets weight 0. If the weights carry no
/// information (all-equal fitness, zero or non-finite total) every individual
/// gets the same weight.
fn weights<C: Chromosome, F: Fitness>(population: &Population<C, F>, optimize: Optimize) -> Vec<f64> {
    let values: Vec<Option<f64>> = population
        .iter()
        .map(|p| p.fitness().map(Fitness::to_f64).filter(|v| v.is_finite()))
        .collect();
    let uniform = vec![1.0; values.len()];

    let (min, max) = values
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min >= max {
        return uniform;
    }

    let weights: Vec<f64> = values
        .iter()
        .map(|v| match (v, optimize) {
            (None, _) => 0.0,
            (Some(v), Optimize::Maximum) if min < 0.0 => v - min,
            (Some(v), Optimize::Maximum) => *v,
            (Some(v), Optimize::Minimum) => max - v,
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        weights
    } else {
        uniform
    }
}

/// Running sums of `weights`; the last element is the total.
fn cumulative(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |acc, &w| {
            *acc += w;
            Some(*acc)
        })
        .collect()
}

/// Index of the first cumulative weight strictly greater than `point`.
fn locate(cumulative: &[f64], point: f64) -> usize {
    cumulative
        .partition_point(|&c| c <= point)
        .min(cumulative.len() - 1) // floating-point fallback
}

/// Fitness-proportionate (roulette wheel) selection.
///
/// One independent spin per selected individual.
///
/// **Warning**: Susceptible to super-individual dominance when fitness
/// variance is high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouletteWheelSelector;

impl RouletteWheelSelector {
    pub fn new() -> Self {
        RouletteWheelSelector
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for RouletteWheelSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut EvolveRng,
    ) -> Population<C, F> {
        if population.is_empty() {
            return Population::new(Vec::new());
        }
        let pop = population.as_slice();
        let cumulative = cumulative(&weights(population, optimize));
        let total = cumulative[cumulative.len() - 1];
        (0..count)
            .map(|_| pop[locate(&cumulative, rng.random::<f64>() * total)].clone())
            .collect()
    }
}

/// Stochastic universal sampling.
///
/// One random offset in `[0, total / count)`, then `count` evenly spaced
/// pointers over the cumulative weights. Same expected counts as the roulette
/// wheel with minimal spread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StochasticUniversalSelector;

impl StochasticUniversalSelector {
    pub fn new() -> Self {
        StochasticUniversalSelector
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for StochasticUniversalSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut EvolveRng,
    ) -> Population<C, F> {
        if population.is_empty() || count == 0 {
            return Population::new(Vec::new());
        }
        let pop = population.as_slice();
        let cumulative = cumulative(&weights(population, optimize));
        let step = cumulative[cumulative.len() - 1] / count as f64;
        let offset = rng.random::<f64>() * step;

        let mut selected = Vec::with_capacity(count);
        let mut idx = 0;
        for k in 0..count {
            let pointer = offset + k as f64 * step;
            while idx + 1 < cumulative.len() && cumulative[idx] <= pointer {
                idx += 1;
            }
            selected.push(pop[idx].clone());
        }
        Population::new(selected)
    }
}

/// Copies the `elite_count` best phenotypes unchanged and fills the rest
/// with the delegate selector.
///
/// Used as survivor selector this makes the best fitness of consecutive
/// generations non-worsening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliteSelector<S = TournamentSelector> {
    elite_count: usize,
    delegate: S,
}

impl EliteSelector<TournamentSelector> {
    pub fn new(elite_count: usize) -> Self {
        EliteSelector {
            elite_count,
            delegate: TournamentSelector::default(),
        }
    }
}

impl<S> EliteSelector<S> {
    pub fn with_delegate(elite_count: usize, delegate: S) -> Self {
        EliteSelector {
            elite_count,
            delegate,
        }
    }
}

impl<C: Chromosome, F: Fitness, S: Selector<C, F>> Selector<C, F> for EliteSelector<S> {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut EvolveRng,
    ) -> Population<C, F> {
        let pop = population.as_slice();
        let elites = self.elite_count.min(count).min(pop.len());
        let order = ranked(population, optimize);
        let head: Population<C, F> = order[..elites].iter().map(|&i| pop[i].clone()).collect();
        let tail = self
            .delegate
            .select(population, count - elites, optimize, rng);
        head.concat(tail)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.delegate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic::{Genotype, IntegerChromosome, Phenotype};
    use crate::random::create_rng;

    fn make_population(fitnesses: &[f64]) -> Population<IntegerChromosome, f64> {
        fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let c = IntegerChromosome::of(0, 1000, &[i as i64]).unwrap();
                Phenotype::with_fitness(Genotype::new(vec![c]).unwrap(), 0, f)
            })
            .collect()
    }

    /// Identifies a selected phenotype by the index stored in its gene.
    fn ids(population: &Population<IntegerChromosome, f64>) -> Vec<usize> {
        population
            .iter()
            .map(|p| p.genotype().first().values()[0] as usize)
            .collect()
    }

    fn counts<S: Selector<IntegerChromosome, f64>>(
        selector: &S,
        pop: &Population<IntegerChromosome, f64>,
        optimize: Optimize,
        draws: usize,
    ) -> Vec<usize> {
        let mut rng = create_rng(42);
        let mut counts = vec![0; pop.len()];
        for id in ids(&selector.select(pop, draws, optimize, &mut rng)) {
            counts[id] += 1;
        }
        counts
    }

    // ---- Truncation ----

    #[test]
    fn test_truncation_takes_top_stable() {
        let pop = make_population(&[3.0, 9.0, 5.0, 9.0, 1.0]);
        let mut rng = create_rng(1);
        let top = TruncationSelector.select(&pop, 3, Optimize::Maximum, &mut rng);
        assert_eq!(ids(&top), vec![1, 3, 2]);
        let low = TruncationSelector.select(&pop, 2, Optimize::Minimum, &mut rng);
        assert_eq!(ids(&low), vec![4, 0]);
    }

    #[test]
    fn test_truncation_cycles_when_count_exceeds_size() {
        let pop = make_population(&[1.0, 2.0]);
        let mut rng = create_rng(1);
        let s = TruncationSelector.select(&pop, 5, Optimize::Maximum, &mut rng);
        assert_eq!(ids(&s), vec![1, 0, 1, 0, 1]);
    }

    // ---- Tournament ----

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let n = 10000;
        let c = counts(&TournamentSelector::new(4), &pop, Optimize::Minimum, n);
        // Index 2 (fitness=1.0) should dominate
        assert!(
            c[2] > 6000,
            "expected best to be selected >60% of the time, got {}/{n}",
            c[2]
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let c = counts(&TournamentSelector::new(1), &pop, Optimize::Maximum, 10000);
        for &x in &c {
            assert!(x > 1500, "expected uniform, got counts: {c:?}");
        }
    }

    #[test]
    fn test_tournament_zero_size_rejected() {
        let s = TournamentSelector::new(0);
        assert_eq!(
            Selector::<IntegerChromosome, f64>::validate(&s),
            Err(ConfigError::TournamentSize)
        );
    }

    // ---- Roulette ----

    #[test]
    fn test_roulette_favors_best_when_minimizing() {
        let pop = make_population(&[100.0, 50.0, 1.0, 80.0]);
        let c = counts(&RouletteWheelSelector, &pop, Optimize::Minimum, 10000);
        assert!(
            c[2] > c[3] && c[3] > c[0],
            "lower fitness should be selected more often: {c:?}"
        );
        // max - f gives the worst individual zero weight
        assert_eq!(c[0], 0);
    }

    #[test]
    fn test_roulette_proportional_when_maximizing() {
        let pop = make_population(&[1.0, 3.0]);
        let c = counts(&RouletteWheelSelector, &pop, Optimize::Maximum, 20000);
        let share = c[1] as f64 / 20000.0;
        assert!((share - 0.75).abs() < 0.03, "expected ~75%, got {share}");
    }

    #[test]
    fn test_roulette_handles_negative_fitness() {
        let pop = make_population(&[-10.0, -5.0, 0.0]);
        let c = counts(&RouletteWheelSelector, &pop, Optimize::Maximum, 10000);
        assert_eq!(c[0], 0);
        assert!(c[2] > c[1]);
    }

    #[test]
    fn test_roulette_equal_fitness_is_uniform() {
        for f in [0.0, 5.0, -3.0] {
            let pop = make_population(&[f; 4]);
            for optimize in [Optimize::Minimum, Optimize::Maximum] {
                let c = counts(&RouletteWheelSelector, &pop, optimize, 10000);
                for &x in &c {
                    assert!(x > 2000, "expected uniform, got {c:?}");
                }
            }
        }
    }

    // ---- SUS ----

    #[test]
    fn test_sus_exact_expectation() {
        // Weights 1:1:2 over 4 pointers -> exactly 1, 1, 2.
        let pop = make_population(&[1.0, 1.0, 2.0]);
        for seed in 0..20 {
            let mut rng = create_rng(seed);
            let s = StochasticUniversalSelector.select(&pop, 4, Optimize::Maximum, &mut rng);
            let mut c = [0; 3];
            for id in ids(&s) {
                c[id] += 1;
            }
            assert_eq!(c, [1, 1, 2], "seed {seed}");
        }
    }

    #[test]
    fn test_sus_equal_fitness() {
        let pop = make_population(&[0.0; 5]);
        let mut rng = create_rng(3);
        let s = StochasticUniversalSelector.select(&pop, 5, Optimize::Minimum, &mut rng);
        assert_eq!(ids(&s), vec![0, 1, 2, 3, 4]);
    }

    // ---- Elite ----

    #[test]
    fn test_elite_keeps_best() {
        let pop = make_population(&[3.0, 9.0, 5.0, 7.0]);
        let mut rng = create_rng(5);
        let s = EliteSelector::new(2).select(&pop, 4, Optimize::Maximum, &mut rng);
        assert_eq!(s.len(), 4);
        assert_eq!(&ids(&s)[..2], &[1, 3]);
    }

    // ---- Common ----

    #[test]
    fn test_selectors_are_deterministic() {
        let pop = make_population(&[4.0, 2.0, 8.0, 6.0, 1.0, 9.0, 3.0]);
        let selectors: Vec<Box<dyn Selector<IntegerChromosome, f64>>> = vec![
            Box::new(TruncationSelector),
            Box::new(TournamentSelector::new(3)),
            Box::new(RouletteWheelSelector),
            Box::new(StochasticUniversalSelector),
            Box::new(EliteSelector::new(2)),
        ];
        for selector in &selectors {
            let a = selector.select(&pop, 20, Optimize::Maximum, &mut create_rng(99));
            let b = selector.select(&pop, 20, Optimize::Maximum, &mut create_rng(99));
            assert_eq!(ids(&a), ids(&b));
            assert_eq!(a.len(), 20);
        }
    }

    #[test]
    fn test_empty_population() {
        let pop = make_population(&[]);
        let mut rng = create_rng(42);
        assert!(TournamentSelector::new(3)
            .select(&pop, 4, Optimize::Maximum, &mut rng)
            .is_empty());
        assert!(RouletteWheelSelector
            .select(&pop, 4, Optimize::Maximum, &mut rng)
            .is_empty());
        assert!(StochasticUniversalSelector
            .select(&pop, 4, Optimize::Maximum, &mut rng)
            .is_empty());
        assert!(TruncationSelector
            .select(&pop, 4, Optimize::Maximum, &mut rng)
            .is_empty());
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);
        let s = RouletteWheelSelector.select(&pop, 3, Optimize::Minimum, &mut rng);
        assert_eq!(ids(&s), vec![0, 0, 0]);
    }
}
