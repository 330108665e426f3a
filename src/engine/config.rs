//! Engine configuration.
//!
//! [`EngineConfig`] holds every scalar parameter of the evolution loop.
//! Operators (selectors, alterers) are configured on the
//! [`EngineBuilder`](super::EngineBuilder) and validated with it.

use super::types::Optimize;
use crate::error::ConfigError;

/// Bound on concurrent fitness evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parallelism {
    /// At most `n` evaluations at a time. `Bounded(1)` evaluates on the
    /// calling thread.
    Bounded(usize),
    /// Use rayon's global pool.
    #[default]
    Unbounded,
}

/// What to do when the fitness function fails for an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// End the stream with [`EvolveError::Evaluation`](crate::EvolveError::Evaluation).
    #[default]
    Abort,
    /// Replace the failing individual with a fresh random one and evaluate
    /// that instead. Each generation gets at most `attempts` re-evaluation
    /// rounds; failures left after the last round abort the stream.
    Reseed { attempts: usize },
}

/// Configuration for the evolution engine.
///
/// # Defaults
///
/// ```
/// use u_evolve::engine::{EngineConfig, Optimize};
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.optimize, Optimize::Maximum);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::engine::{EngineConfig, Optimize, Parallelism};
///
/// let config = EngineConfig::default()
///     .with_population_size(200)
///     .with_offspring_fraction(0.8)
///     .with_optimize(Optimize::Minimum)
///     .with_parallelism(Parallelism::Bounded(4))
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of individuals in every generation.
    pub population_size: usize,

    /// Share of each generation produced by offspring selection and
    /// alteration, in `(0, 1]`. The rest are survivors.
    pub offspring_fraction: f64,

    /// Survivors older than this many generations are replaced by fresh
    /// random individuals.
    pub max_phenotype_age: u64,

    /// Optimization direction.
    pub optimize: Optimize,

    /// Bound on concurrent fitness evaluations.
    pub parallelism: Parallelism,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Stop after this many generations.
    pub max_generations: Option<u64>,

    /// Stop once the best fitness meets or beats this value.
    pub target_fitness: Option<f64>,

    /// Number of generations without improvement before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Optional wall-clock limit for the whole stream, in milliseconds.
    ///
    /// Checked between generations.
    pub time_limit_ms: Option<u64>,

    /// Optional wall-clock limit for a single generation, in milliseconds.
    ///
    /// A generation exceeding it is discarded and the stream stops.
    pub generation_timeout_ms: Option<u64>,

    /// Reaction to fitness-function failures.
    pub failure_policy: FailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            offspring_fraction: 0.6,
            max_phenotype_age: 70,
            optimize: Optimize::Maximum,
            parallelism: Parallelism::Unbounded,
            seed: None,
            max_generations: None,
            target_fitness: None,
            stagnation_limit: 0,
            time_limit_ms: None,
            generation_timeout_ms: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the offspring fraction.
    pub fn with_offspring_fraction(mut self, fraction: f64) -> Self {
        self.offspring_fraction = fraction;
        self
    }

    /// Sets the maximal phenotype age.
    pub fn with_max_phenotype_age(mut self, age: u64) -> Self {
        self.max_phenotype_age = age;
        self
    }

    /// Sets the optimization direction.
    pub fn with_optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = optimize;
        self
    }

    /// Sets the evaluation concurrency bound.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: u64) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the target fitness.
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the wall-clock time limit.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the per-generation timeout.
    pub fn with_generation_timeout_ms(mut self, ms: u64) -> Self {
        self.generation_timeout_ms = Some(ms);
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Number of offspring per generation: `round(size * fraction)`.
    pub fn offspring_count(&self) -> usize {
        let n = (self.population_size as f64 * self.offspring_fraction).round() as usize;
        n.min(self.population_size)
    }

    /// Number of survivors per generation.
    pub fn survivor_count(&self) -> usize {
        self.population_size - self.offspring_count()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationSize(self.population_size));
        }
        if !(self.offspring_fraction > 0.0 && self.offspring_fraction <= 1.0) {
            return Err(ConfigError::OffspringFraction(self.offspring_fraction));
        }
        if self.max_phenotype_age == 0 {
            return Err(ConfigError::PhenotypeAge);
        }
        if self.parallelism == Parallelism::Bounded(0) {
            return Err(ConfigError::Parallelism);
        }
        if self.max_generations == Some(0) {
            return Err(ConfigError::Limit("max_generations"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::Limit("time_limit_ms"));
        }
        if self.generation_timeout_ms == Some(0) {
            return Err(ConfigError::Limit("generation_timeout_ms"));
        }
        if matches!(self.target_fitness, Some(t) if !t.is_finite()) {
            return Err(ConfigError::Limit("target_fitness"));
        }
        if self.failure_policy == (FailurePolicy::Reseed { attempts: 0 }) {
            return Err(ConfigError::ReseedAttempts);
        }
        Ok(())
    }
}

/// Checks that a named probability lies in `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.population_size, 50);
        assert!((config.offspring_fraction - 0.6).abs() < 1e-10);
        assert_eq!(config.max_phenotype_age, 70);
        assert_eq!(config.parallelism, Parallelism::Unbounded);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert!(config.seed.is_none());
        assert!(config.max_generations.is_none());
        assert_eq!(config.stagnation_limit, 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_population_size(200)
            .with_offspring_fraction(0.5)
            .with_max_phenotype_age(10)
            .with_optimize(Optimize::Minimum)
            .with_parallelism(Parallelism::Bounded(2))
            .with_max_generations(1000)
            .with_target_fitness(0.0)
            .with_stagnation_limit(25)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_phenotype_age, 10);
        assert_eq!(config.optimize, Optimize::Minimum);
        assert_eq!(config.parallelism, Parallelism::Bounded(2));
        assert_eq!(config.max_generations, Some(1000));
        assert_eq!(config.target_fitness, Some(0.0));
        assert_eq!(config.stagnation_limit, 25);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_offspring_split() {
        let config = EngineConfig::default().with_population_size(50);
        assert_eq!(config.offspring_count(), 30);
        assert_eq!(config.survivor_count(), 20);

        let all = config.clone().with_offspring_fraction(1.0);
        assert_eq!(all.offspring_count(), 50);
        assert_eq!(all.survivor_count(), 0);
    }

    #[test]
    fn test_validate_population_zero() {
        let config = EngineConfig::default().with_population_size(0);
        assert_eq!(config.validate(), Err(ConfigError::PopulationSize(0)));
    }

    #[test]
    fn test_validate_offspring_fraction() {
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let config = EngineConfig::default().with_offspring_fraction(bad);
            assert!(
                matches!(config.validate(), Err(ConfigError::OffspringFraction(_))),
                "fraction {bad} should be rejected"
            );
        }
        assert!(EngineConfig::default()
            .with_offspring_fraction(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_parallelism() {
        let config = EngineConfig::default().with_parallelism(Parallelism::Bounded(0));
        assert_eq!(config.validate(), Err(ConfigError::Parallelism));
    }

    #[test]
    fn test_validate_zero_limits() {
        assert!(EngineConfig::default()
            .with_max_generations(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_time_limit_ms(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_generation_timeout_ms(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_time_limit_ms(1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_reseed_attempts() {
        let config =
            EngineConfig::default().with_failure_policy(FailurePolicy::Reseed { attempts: 0 });
        assert_eq!(config.validate(), Err(ConfigError::ReseedAttempts));
    }

    #[test]
    fn test_check_probability() {
        assert!(check_probability("mutation", 0.0).is_ok());
        assert!(check_probability("mutation", 1.0).is_ok());
        assert!(check_probability("mutation", 1.5).is_err());
        assert!(check_probability("mutation", f64::NAN).is_err());
    }
}
