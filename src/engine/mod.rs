//! Generational evolution engine.
//!
//! An [`Engine`] is assembled by [`EngineBuilder`] from a genotype template, a
//! [`FitnessFunction`], and an operator pipeline. [`Engine::stream`] returns a
//! lazy [`EvolutionStream`] that performs one generation per `next` call.
//!
//! # Core Traits
//!
//! - [`Fitness`]: comparable fitness value
//! - [`FitnessFunction`]: the problem, an opaque genotype-to-fitness map
//! - [`Selector`]: chooses offspring and survivors
//! - [`Alterer`]: mutation and recombination
//!
//! # Key Types
//!
//! - [`EngineConfig`]: population size, offspring share, limits, seed
//! - [`Evaluator`]: bounded-concurrency fitness evaluation
//! - [`EvolutionResult`]: one generation's snapshot
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover (OX, PMX, CX) and segment inversion
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*

mod alterer;
mod config;
mod evaluator;
pub mod operators;
mod runner;
mod selection;
mod stream;
mod types;

pub use alterer::{
    Alterer, AltererResult, CompositeAlterer, CycleCrossover, InversionMutator, MeanAlterer,
    MultiPointCrossover, Mutator, OrderCrossover, PartiallyMatchedCrossover, SinglePointCrossover,
    SwapMutator,
};
pub use config::{EngineConfig, FailurePolicy, Parallelism};
pub use evaluator::{Evaluation, EvaluationFailure, Evaluator, Interrupt, Interruption};
pub use runner::{Engine, EngineBuilder, EvolutionDurations};
pub use selection::{
    EliteSelector, RouletteWheelSelector, Selector, StochasticUniversalSelector,
    TournamentSelector, TruncationSelector,
};
pub use stream::{EvolutionResult, EvolutionStream, StopReason};
pub use types::{FallibleFitnessFn, Fitness, FitnessFn, FitnessFunction, Optimize};
