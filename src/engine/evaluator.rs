//! Concurrent fitness evaluation.
//!
//! The [`Evaluator`] owns the worker pool. It evaluates every phenotype that
//! has no fitness yet and leaves the others untouched. Results are attached
//! by position, so the output order never depends on which worker finished
//! first.

use super::config::Parallelism;
use super::types::{Fitness, FitnessFunction};
use crate::error::{ConfigError, EvolveError, FitnessError, FitnessPanic};
use crate::genetic::{Chromosome, Phenotype, Population};
use log::warn;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why an evaluation pass stopped before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancelled,
    TimedOut,
}

/// Cancellation flag and deadline, checked before each individual.
///
/// Interruption is advisory: evaluations already running finish normally.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl Interrupt {
    pub fn new(cancel: Option<Arc<AtomicBool>>, deadline: Option<Instant>) -> Self {
        Interrupt { cancel, deadline }
    }

    /// Never interrupts.
    pub fn none() -> Self {
        Interrupt::default()
    }

    pub fn check(&self) -> Option<Interruption> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Some(Interruption::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(Interruption::TimedOut);
        }
        None
    }
}

/// Failure of one individual's evaluation.
#[derive(Debug)]
pub struct EvaluationFailure {
    /// Position in the evaluated population.
    pub index: usize,
    pub error: FitnessError,
}

/// Output of one evaluation pass.
///
/// Failed and skipped individuals stay unevaluated in `population`.
#[derive(Debug)]
pub struct Evaluation<C: Chromosome, F> {
    pub population: Population<C, F>,
    pub failures: Vec<EvaluationFailure>,
    pub interrupted: Option<Interruption>,
    /// Number of fitness values computed in this pass.
    pub evaluated: usize,
}

impl<C: Chromosome, F> Evaluation<C, F> {
    /// `true` if every individual is evaluated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.interrupted.is_none()
    }
}

enum Outcome<F> {
    Kept,
    Done(F),
    Failed(FitnessError),
    Skipped(Interruption),
}

#[derive(Debug)]
enum Mode {
    Serial,
    Pool(ThreadPool),
    Global,
}

/// Evaluates populations with bounded concurrency.
#[derive(Debug)]
pub struct Evaluator {
    mode: Mode,
}

impl Evaluator {
    /// Creates an evaluator for the given bound.
    ///
    /// `Bounded(1)` evaluates on the calling thread; `Bounded(n)` builds a
    /// dedicated pool of `n` threads; `Unbounded` uses rayon's global pool.
    pub fn new(parallelism: Parallelism) -> Result<Self, EvolveError> {
        let mode = match parallelism {
            Parallelism::Bounded(0) => return Err(ConfigError::Parallelism.into()),
            Parallelism::Bounded(1) => Mode::Serial,
            Parallelism::Bounded(n) => {
                Mode::Pool(ThreadPoolBuilder::new().num_threads(n).build()?)
            }
            Parallelism::Unbounded => Mode::Global,
        };
        Ok(Evaluator { mode })
    }

    /// An evaluator that never spawns threads.
    pub fn serial() -> Self {
        Evaluator { mode: Mode::Serial }
    }

    /// Evaluates every unevaluated phenotype of `population`.
    pub fn evaluate<C, F>(
        &self,
        population: &Population<C, F>,
        fitness: &dyn FitnessFunction<C, F>,
        interrupt: &Interrupt,
    ) -> Evaluation<C, F>
    where
        C: Chromosome,
        F: Fitness,
    {
        let evaluate_one = |phenotype: &Phenotype<C, F>| -> Outcome<F> {
            if phenotype.is_evaluated() {
                return Outcome::Kept;
            }
            if let Some(reason) = interrupt.check() {
                return Outcome::Skipped(reason);
            }
            match catch_unwind(AssertUnwindSafe(|| fitness.evaluate(phenotype.genotype()))) {
                Ok(Ok(value)) => Outcome::Done(value),
                Ok(Err(error)) => Outcome::Failed(error),
                Err(payload) => Outcome::Failed(Box::new(FitnessPanic(panic_message(&*payload)))),
            }
        };

        let slice = population.as_slice();
        let outcomes: Vec<Outcome<F>> = match &self.mode {
            Mode::Serial => slice.iter().map(evaluate_one).collect(),
            Mode::Pool(pool) => pool.install(|| slice.par_iter().map(evaluate_one).collect()),
            Mode::Global => slice.par_iter().map(evaluate_one).collect(),
        };

        let mut failures = Vec::new();
        let mut interrupted = None;
        let mut evaluated = 0;
        let phenotypes = slice
            .iter()
            .zip(outcomes)
            .enumerate()
            .map(|(index, (phenotype, outcome))| match outcome {
                Outcome::Kept => phenotype.clone(),
                Outcome::Done(value) => {
                    evaluated += 1;
                    phenotype.evaluated(value)
                }
                Outcome::Failed(error) => {
                    warn!("fitness evaluation failed for individual {index}: {error}");
                    failures.push(EvaluationFailure { index, error });
                    phenotype.clone()
                }
                Outcome::Skipped(reason) => {
                    interrupted.get_or_insert(reason);
                    phenotype.clone()
                }
            })
            .collect();

        Evaluation {
            population: phenotypes,
            failures,
            interrupted,
            evaluated,
        }
    }

    /// Runs two closures, concurrently unless the evaluator is serial.
    pub fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match &self.mode {
            Mode::Serial => (a(), b()),
            Mode::Pool(pool) => pool.join(a, b),
            Mode::Global => rayon::join(a, b),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
