//! Lazy, cancellable sequence of generations.

use super::evaluator::{Interrupt, Interruption};
use super::runner::{Engine, EvolutionDurations, Evaluated, Evolved};
use super::types::Fitness;
use crate::error::EvolveError;
use crate::genetic::{Chromosome, Phenotype, Population};
use crate::random::{create_rng, EvolveRng};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of one completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult<C: Chromosome, F> {
    pub generation: u64,
    /// The fully evaluated population of this generation.
    pub population: Population<C, F>,
    /// Best phenotype of this generation.
    pub best: Phenotype<C, F>,
    /// Best phenotype seen so far in this stream. Never gets worse.
    pub best_ever: Phenotype<C, F>,
    /// Genes changed by the alterers.
    pub altered: usize,
    /// Survivors replaced for exceeding the maximal age.
    pub killed: usize,
    pub durations: EvolutionDurations,
}

impl<C: Chromosome, F: Copy> EvolutionResult<C, F> {
    pub fn best_fitness(&self) -> Option<F> {
        self.best_ever.fitness()
    }
}

/// Why a stream stopped yielding results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation flag was set.
    Cancelled,
    /// A generation exceeded `generation_timeout_ms` and was discarded.
    GenerationTimeout { generation: u64 },
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// `max_generations` results were emitted.
    MaxGenerations,
    /// The best fitness reached `target_fitness`.
    TargetFitness,
    /// `stagnation_limit` generations passed without improvement.
    Stagnation,
    /// An error was yielded.
    Failed,
}

struct State<C: Chromosome, F> {
    population: Population<C, F>,
    generation: u64,
}

/// Iterator over generations of an [`Engine`].
///
/// Nothing runs until the first call to `next`. Each call performs exactly
/// one generation and yields its result; the first yielded generation is the
/// one after the starting population. After a stop condition or an error the
/// stream yields `None` and [`stop_reason`](Self::stop_reason) says why.
///
/// Cancellation and time limits are checked between generations and, for
/// individuals not yet started, during evaluation. A generation interrupted
/// that way is discarded rather than yielded partially evaluated.
pub struct EvolutionStream<'a, C: Chromosome, F: Fitness> {
    engine: &'a Engine<C, F>,
    rng: EvolveRng,
    seed_population: Option<Population<C, F>>,
    start_generation: u64,
    state: Option<State<C, F>>,
    cancel: Option<Arc<AtomicBool>>,
    started: Option<Instant>,
    best_ever: Option<Phenotype<C, F>>,
    emitted: u64,
    stagnation: usize,
    stop: Option<StopReason>,
}

impl<'a, C: Chromosome, F: Fitness> EvolutionStream<'a, C, F> {
    pub(crate) fn new(
        engine: &'a Engine<C, F>,
        seed_population: Option<Population<C, F>>,
        start_generation: u64,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Self {
        let seed = engine.config().seed.unwrap_or_else(rand::random);
        EvolutionStream {
            engine,
            rng: create_rng(seed),
            seed_population,
            start_generation,
            state: None,
            cancel,
            started: None,
            best_ever: None,
            emitted: 0,
            stagnation: 0,
            stop: None,
        }
    }

    /// Sets the cancellation flag.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Why the stream stopped, or `None` while it is still running.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Best phenotype seen so far.
    pub fn best_ever(&self) -> Option<&Phenotype<C, F>> {
        self.best_ever.as_ref()
    }

    fn interrupt(&self, generation_start: Instant) -> Interrupt {
        let config = self.engine.config();
        let generation_deadline = config
            .generation_timeout_ms
            .map(|ms| generation_start + Duration::from_millis(ms));
        let stream_deadline = self
            .started
            .zip(config.time_limit_ms)
            .map(|(start, ms)| start + Duration::from_millis(ms));
        let deadline = match (generation_deadline, stream_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Interrupt::new(self.cancel.clone(), deadline)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn time_exceeded(&self) -> bool {
        match (self.started, self.engine.config().time_limit_ms) {
            (Some(start), Some(ms)) => start.elapsed() >= Duration::from_millis(ms),
            _ => false,
        }
    }

    fn finish(&mut self, reason: StopReason) {
        info!(
            "evolution stopped after {} generation(s): {reason:?}",
            self.emitted
        );
        self.stop = Some(reason);
    }

    /// Maps an interruption of generation `generation` to its stop reason.
    fn interrupted(&mut self, reason: Interruption, generation: u64) {
        let reason = match reason {
            Interruption::Cancelled => StopReason::Cancelled,
            Interruption::TimedOut if self.time_exceeded() => StopReason::TimeLimit,
            Interruption::TimedOut => StopReason::GenerationTimeout { generation },
        };
        self.finish(reason);
    }

    fn fail(&mut self, error: EvolveError) -> Option<Result<EvolutionResult<C, F>, EvolveError>> {
        log::error!("evolution failed: {error}");
        self.finish(StopReason::Failed);
        Some(Err(error))
    }

    /// Builds and evaluates the starting population.
    ///
    /// Returns `Ok(false)` if the stream was interrupted meanwhile.
    fn initialize(&mut self) -> Result<bool, EvolveError> {
        let engine = self.engine;
        let config = engine.config();
        let size = config.population_size;
        let generation = self.start_generation;
        info!(
            "evolution started: population {size}, offspring {}, survivors {}, seed {:?}",
            config.offspring_count(),
            config.survivor_count(),
            config.seed
        );

        let mut phenotypes = self
            .seed_population
            .take()
            .map(Population::into_vec)
            .unwrap_or_default();
        phenotypes.truncate(size);
        while phenotypes.len() < size {
            phenotypes.push(engine.new_phenotype(generation, &mut self.rng));
        }

        let interrupt = self.interrupt(Instant::now());
        let population = Population::new(phenotypes);
        match engine.evaluate(population, generation, &interrupt, &mut self.rng)? {
            Evaluated::Complete(population) => {
                self.best_ever = population.best(config.optimize).cloned();
                self.state = Some(State {
                    population,
                    generation,
                });
                Ok(true)
            }
            Evaluated::Interrupted(reason) => {
                self.interrupted(reason, generation);
                Ok(false)
            }
        }
    }

    /// Applies the stop conditions checked after a result is emitted.
    fn check_limits(&mut self, improved: bool) {
        let engine = self.engine;
        let config = engine.config();
        self.stagnation = if improved { 0 } else { self.stagnation + 1 };

        let reached_target = match (config.target_fitness, self.best_ever.as_ref()) {
            (Some(target), Some(best)) => best
                .fitness()
                .is_some_and(|f| config.optimize.reaches(f.to_f64(), target)),
            _ => false,
        };

        if config.max_generations.is_some_and(|n| self.emitted >= n) {
            self.finish(StopReason::MaxGenerations);
        } else if reached_target {
            self.finish(StopReason::TargetFitness);
        } else if config.stagnation_limit > 0 && self.stagnation >= config.stagnation_limit {
            self.finish(StopReason::Stagnation);
        }
    }
}

impl<C: Chromosome, F: Fitness> Iterator for EvolutionStream<'_, C, F> {
    type Item = Result<EvolutionResult<C, F>, EvolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stop.is_some() {
            return None;
        }
        if self.is_cancelled() {
            self.finish(StopReason::Cancelled);
            return None;
        }

        if self.state.is_none() {
            self.started = Some(Instant::now());
            match self.initialize() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return self.fail(e),
            }
        }
        if self.time_exceeded() {
            self.finish(StopReason::TimeLimit);
            return None;
        }

        let state = self.state.as_ref()?;
        let generation = state.generation + 1;
        let generation_start = Instant::now();
        let interrupt = self.interrupt(generation_start);
        let step = match self
            .engine
            .evolve(&state.population, generation, &mut self.rng, &interrupt)
        {
            Ok(Evolved::Complete(step)) => step,
            Ok(Evolved::Interrupted(reason)) => {
                self.interrupted(reason, generation);
                return None;
            }
            Err(e) => return self.fail(e),
        };

        let engine = self.engine;
        let config = engine.config();
        if config
            .generation_timeout_ms
            .is_some_and(|ms| generation_start.elapsed() > Duration::from_millis(ms))
        {
            self.finish(StopReason::GenerationTimeout { generation });
            return None;
        }

        let optimize = config.optimize;
        let best = step.population.best(optimize).cloned()?;
        let improved = optimize.is_better(
            best.fitness(),
            self.best_ever.as_ref().and_then(Phenotype::fitness),
        );
        if improved || self.best_ever.is_none() {
            self.best_ever = Some(best.clone());
        }
        let best_ever = self.best_ever.clone().unwrap_or_else(|| best.clone());

        debug!(
            "generation {generation}: best {:?}, best ever {:?}, altered {}, killed {}, {:?}",
            best.fitness(),
            best_ever.fitness(),
            step.altered,
            step.killed,
            step.durations.total
        );

        let result = EvolutionResult {
            generation,
            population: step.population.clone(),
            best,
            best_ever,
            altered: step.altered,
            killed: step.killed,
            durations: step.durations,
        };
        self.state = Some(State {
            population: step.population,
            generation,
        });
        self.emitted += 1;
        self.check_limits(improved);
        Some(Ok(result))
    }
}
