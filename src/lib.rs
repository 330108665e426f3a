//! Generic genetic encodings and a concurrent generational evolution engine.
//!
//! - [`genetic`]: genes, chromosomes (bit, integer, real, permutation),
//!   genotypes, phenotypes, populations, and their tagged decomposition for
//!   serialization.
//! - [`engine`]: selectors, alterers, bounded-concurrency fitness evaluation,
//!   and the lazy, cancellable stream of generations.
//! - [`random`]: the seeded random source every stochastic component draws
//!   from.
//!
//! # Quick start
//!
//! ```
//! use u_evolve::engine::{Engine, EngineConfig, FitnessFn, Mutator, SinglePointCrossover};
//! use u_evolve::genetic::{BitChromosome, Genotype};
//!
//! let template = Genotype::new(vec![BitChromosome::new(16, 0.5)?])?;
//! let engine = Engine::builder(
//!     template,
//!     FitnessFn::new(|g: &Genotype<BitChromosome>| g.first().count_ones()),
//! )
//! .alterers(vec![
//!     Box::new(SinglePointCrossover::new(0.2)),
//!     Box::new(Mutator::new(0.05)),
//! ])
//! .config(EngineConfig::default().with_seed(42).with_max_generations(50))
//! .build()?;
//!
//! let mut best = None;
//! for result in engine.stream() {
//!     best = result?.best_fitness();
//! }
//! assert!(best.is_some());
//! # Ok::<(), u_evolve::EvolveError>(())
//! ```
//!
//! # Architecture
//!
//! Every stage of a generation builds a new population value; nothing is
//! mutated in place, so evaluation can run on a thread pool without locks.
//! Runs are reproducible for a fixed seed regardless of the parallelism
//! bound.

pub mod engine;
pub mod error;
pub mod genetic;
pub mod random;

pub use error::{ConfigError, EncodingError, EvolveError, FitnessError, FitnessPanic};
