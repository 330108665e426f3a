//! Engine construction and the generational step.
//!
//! [`Engine`] holds the immutable operator pipeline. One generation:
//!
//! 1. offspring and survivors are selected from the previous population,
//!    concurrently, each from its own forked random source
//! 2. survivors older than `max_phenotype_age` are replaced by fresh
//!    individuals
//! 3. the offspring are altered
//! 4. survivors and offspring are merged (survivors first) and every
//!    individual without a fitness is evaluated
//!
//! Streams over the engine live in [`stream`](super::stream).

use super::alterer::{Alterer, CompositeAlterer, Mutator, SinglePointCrossover};
use super::config::{EngineConfig, FailurePolicy};
use super::evaluator::{Evaluator, Interrupt, Interruption};
use super::selection::{Selector, TournamentSelector};
use super::stream::EvolutionStream;
use super::types::{Fitness, FitnessFunction};
use crate::error::EvolveError;
use crate::genetic::{Chromosome, Genotype, Phenotype, Population};
use crate::random::{fork_rng, EvolveRng};
use log::warn;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wall-clock time spent in each stage of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvolutionDurations {
    pub selection: Duration,
    pub alteration: Duration,
    pub evaluation: Duration,
    pub total: Duration,
}

/// One completed generational step, before stream bookkeeping.
pub(crate) struct Step<C: Chromosome, F> {
    pub population: Population<C, F>,
    pub altered: usize,
    pub killed: usize,
    pub durations: EvolutionDurations,
}

/// Result of evaluating a population under the failure policy.
pub(crate) enum Evaluated<C: Chromosome, F> {
    Complete(Population<C, F>),
    Interrupted(Interruption),
}

/// Result of one generational step.
pub(crate) enum Evolved<C: Chromosome, F> {
    Complete(Step<C, F>),
    Interrupted(Interruption),
}

/// A configured evolution engine.
///
/// ```
/// use u_evolve::engine::{Engine, EngineConfig, FitnessFn};
/// use u_evolve::genetic::{BitChromosome, Genotype};
///
/// let template = Genotype::new(vec![BitChromosome::new(8, 0.5).unwrap()]).unwrap();
/// let engine = Engine::builder(
///     template,
///     FitnessFn::new(|g: &Genotype<BitChromosome>| g.first().count_ones()),
/// )
/// .config(EngineConfig::default().with_seed(7).with_max_generations(20))
/// .build()
/// .unwrap();
///
/// let last = engine.stream().filter_map(Result::ok).last().unwrap();
/// assert_eq!(last.generation, 20);
/// ```
pub struct Engine<C: Chromosome, F: Fitness> {
    template: Genotype<C>,
    fitness: Box<dyn FitnessFunction<C, F>>,
    offspring_selector: Box<dyn Selector<C, F>>,
    survivor_selector: Box<dyn Selector<C, F>>,
    alterer: Box<dyn Alterer<C, F>>,
    evaluator: Evaluator,
    config: EngineConfig,
}

impl<C: Chromosome, F: Fitness> Engine<C, F> {
    /// Starts building an engine for genotypes shaped like `template`.
    pub fn builder<Fit>(template: Genotype<C>, fitness: Fit) -> EngineBuilder<C, F>
    where
        Fit: FitnessFunction<C, F> + 'static,
    {
        EngineBuilder::new(template, fitness)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn template(&self) -> &Genotype<C> {
        &self.template
    }

    /// A lazy stream of generations starting from a random population.
    pub fn stream(&self) -> EvolutionStream<'_, C, F> {
        EvolutionStream::new(self, None, 0, None)
    }

    /// Like [`stream`](Self::stream), stopping once `cancel` is set.
    pub fn stream_with_cancel(&self, cancel: Arc<AtomicBool>) -> EvolutionStream<'_, C, F> {
        self.stream().with_cancel(cancel)
    }

    /// Resumes from a stored population that was generation `generation`.
    ///
    /// The population is truncated or filled with fresh individuals to the
    /// configured size, and unevaluated individuals are evaluated before the
    /// first step.
    pub fn stream_from(
        &self,
        population: Population<C, F>,
        generation: u64,
    ) -> EvolutionStream<'_, C, F> {
        EvolutionStream::new(self, Some(population), generation, None)
    }

    /// A fresh, unevaluated individual born in `generation`.
    pub(crate) fn new_phenotype(&self, generation: u64, rng: &mut EvolveRng) -> Phenotype<C, F> {
        Phenotype::new(self.template.new_instance(rng), generation)
    }

    /// Evaluates `population` and applies the failure policy.
    ///
    /// Reseeding draws replacements from `rng`.
    pub(crate) fn evaluate(
        &self,
        population: Population<C, F>,
        generation: u64,
        interrupt: &Interrupt,
        rng: &mut EvolveRng,
    ) -> Result<Evaluated<C, F>, EvolveError> {
        let mut population = population;
        let mut round = 0;
        loop {
            let evaluation = self
                .evaluator
                .evaluate(&population, self.fitness.as_ref(), interrupt);
            if let Some(reason) = evaluation.interrupted {
                return Ok(Evaluated::Interrupted(reason));
            }
            let mut failures = evaluation.failures;
            if failures.is_empty() {
                return Ok(Evaluated::Complete(evaluation.population));
            }

            let retry = match self.config.failure_policy {
                FailurePolicy::Abort => false,
                FailurePolicy::Reseed { attempts } => round < attempts,
            };
            if !retry {
                let first = failures.swap_remove(0);
                return Err(EvolveError::Evaluation {
                    generation,
                    index: first.index,
                    source: first.error,
                });
            }

            round += 1;
            warn!(
                "reseeding {} failed individual(s) in generation {generation} (round {round})",
                failures.len()
            );
            let mut phenotypes = evaluation.population.into_vec();
            for failure in &failures {
                phenotypes[failure.index] = self.new_phenotype(generation, rng);
            }
            population = Population::new(phenotypes);
        }
    }

    /// Runs one generation, producing generation `generation` from
    /// `previous`. Draws exactly three seeds from `rng`.
    pub(crate) fn evolve(
        &self,
        previous: &Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
        interrupt: &Interrupt,
    ) -> Result<Evolved<C, F>, EvolveError> {
        let start = Instant::now();
        let mut offspring_rng = fork_rng(rng);
        let mut survivor_rng = fork_rng(rng);
        let mut alteration_rng = fork_rng(rng);
        let optimize = self.config.optimize;

        let (offspring, (survivors, killed)) = self.evaluator.join(
            || {
                self.offspring_selector.select(
                    previous,
                    self.config.offspring_count(),
                    optimize,
                    &mut offspring_rng,
                )
            },
            || {
                let survivors = self.survivor_selector.select(
                    previous,
                    self.config.survivor_count(),
                    optimize,
                    &mut survivor_rng,
                );
                self.filter_aged(survivors, generation, &mut survivor_rng)
            },
        );
        let selected = Instant::now();

        let altered = self.alterer.alter(&offspring, generation, &mut alteration_rng);
        let alteration_done = Instant::now();

        let merged = survivors.concat(altered.population);
        let population = match self.evaluate(merged, generation, interrupt, &mut alteration_rng)? {
            Evaluated::Complete(population) => population,
            Evaluated::Interrupted(reason) => return Ok(Evolved::Interrupted(reason)),
        };
        let end = Instant::now();

        Ok(Evolved::Complete(Step {
            population,
            altered: altered.alterations,
            killed,
            durations: EvolutionDurations {
                selection: selected - start,
                alteration: alteration_done - selected,
                evaluation: end - alteration_done,
                total: end - start,
            },
        }))
    }

    /// Replaces survivors older than the configured limit.
    fn filter_aged(
        &self,
        survivors: Population<C, F>,
        generation: u64,
        rng: &mut EvolveRng,
    ) -> (Population<C, F>, usize) {
        let mut killed = 0;
        let phenotypes = survivors
            .into_iter()
            .map(|p| {
                if p.age(generation) > self.config.max_phenotype_age {
                    killed += 1;
                    self.new_phenotype(generation, rng)
                } else {
                    p
                }
            })
            .collect();
        (phenotypes, killed)
    }
}

/// Builder for [`Engine`].
///
/// Defaults: tournament selection (`k = 3`) for offspring and survivors,
/// single-point crossover (0.2) followed by mutation (0.01).
pub struct EngineBuilder<C: Chromosome, F: Fitness> {
    template: Genotype<C>,
    fitness: Box<dyn FitnessFunction<C, F>>,
    offspring_selector: Box<dyn Selector<C, F>>,
    survivor_selector: Box<dyn Selector<C, F>>,
    alterer: Box<dyn Alterer<C, F>>,
    config: EngineConfig,
}

impl<C: Chromosome, F: Fitness> EngineBuilder<C, F> {
    pub fn new<Fit>(template: Genotype<C>, fitness: Fit) -> Self
    where
        Fit: FitnessFunction<C, F> + 'static,
    {
        EngineBuilder {
            template,
            fitness: Box::new(fitness),
            offspring_selector: Box::new(TournamentSelector::default()),
            survivor_selector: Box::new(TournamentSelector::default()),
            alterer: Box::new(
                CompositeAlterer::default()
                    .then(SinglePointCrossover::new(0.2))
                    .then(Mutator::new(0.01)),
            ),
            config: EngineConfig::default(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `selector` for both offspring and survivors.
    pub fn selector<S>(self, selector: S) -> Self
    where
        S: Selector<C, F> + Clone + 'static,
    {
        self.offspring_selector(selector.clone())
            .survivors_selector(selector)
    }

    pub fn offspring_selector<S: Selector<C, F> + 'static>(mut self, selector: S) -> Self {
        self.offspring_selector = Box::new(selector);
        self
    }

    pub fn survivors_selector<S: Selector<C, F> + 'static>(mut self, selector: S) -> Self {
        self.survivor_selector = Box::new(selector);
        self
    }

    pub fn alterer<A: Alterer<C, F> + 'static>(mut self, alterer: A) -> Self {
        self.alterer = Box::new(alterer);
        self
    }

    /// Applies `alterers` in the given order.
    pub fn alterers(mut self, alterers: Vec<Box<dyn Alterer<C, F>>>) -> Self {
        self.alterer = Box::new(CompositeAlterer::new(alterers));
        self
    }

    /// Validates every parameter and builds the evaluation pool.
    pub fn build(self) -> Result<Engine<C, F>, EvolveError> {
        self.config.validate()?;
        self.offspring_selector.validate()?;
        self.survivor_selector.validate()?;
        self.alterer.validate()?;
        let evaluator = Evaluator::new(self.config.parallelism)?;
        Ok(Engine {
            template: self.template,
            fitness: self.fitness,
            offspring_selector: self.offspring_selector,
            survivor_selector: self.survivor_selector,
            alterer: self.alterer,
            evaluator,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FallibleFitnessFn, FitnessFn, Parallelism};
    use crate::error::ConfigError;
    use crate::genetic::BitChromosome;
    use crate::random::create_rng;

    fn template() -> Genotype<BitChromosome> {
        Genotype::new(vec![BitChromosome::new(10, 0.5).unwrap()]).unwrap()
    }

    fn ones() -> FitnessFn<impl Fn(&Genotype<BitChromosome>) -> usize + Send + Sync> {
        FitnessFn::new(|g: &Genotype<BitChromosome>| g.first().count_ones())
    }

    fn random_population(engine: &Engine<BitChromosome, usize>, seed: u64) -> Population<BitChromosome, usize> {
        let mut rng = create_rng(seed);
        let pop: Population<BitChromosome, usize> = (0..engine.config().population_size)
            .map(|_| engine.new_phenotype(0, &mut rng))
            .collect();
        match engine.evaluate(pop, 0, &Interrupt::none(), &mut rng).unwrap() {
            Evaluated::Complete(p) => p,
            Evaluated::Interrupted(_) => unreachable!(),
        }
    }

    fn complete(evolved: Evolved<BitChromosome, usize>) -> Step<BitChromosome, usize> {
        match evolved {
            Evolved::Complete(step) => step,
            Evolved::Interrupted(reason) => panic!("unexpected interruption: {reason:?}"),
        }
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let result = Engine::builder(template(), ones())
            .config(EngineConfig::default().with_population_size(0))
            .build();
        assert!(matches!(
            result,
            Err(EvolveError::Config(ConfigError::PopulationSize(0)))
        ));
    }

    #[test]
    fn test_build_rejects_invalid_operators() {
        let result = Engine::builder(template(), ones())
            .selector(TournamentSelector::new(0))
            .build();
        assert!(matches!(
            result,
            Err(EvolveError::Config(ConfigError::TournamentSize))
        ));

        let result = Engine::builder(template(), ones())
            .alterer(Mutator::new(1.5))
            .build();
        assert!(matches!(
            result,
            Err(EvolveError::Config(ConfigError::Probability { .. }))
        ));
    }

    #[test]
    fn test_step_keeps_population_size() {
        let engine = Engine::builder(template(), ones())
            .config(EngineConfig::default().with_parallelism(Parallelism::Bounded(1)))
            .build()
            .unwrap();
        let previous = random_population(&engine, 1);
        let mut rng = create_rng(42);
        let step = engine
            .evolve(&previous, 1, &mut rng, &Interrupt::none())
            .map(complete)
            .unwrap();
        assert_eq!(step.population.len(), 50);
        assert!(step.population.is_evaluated());
        assert_eq!(step.killed, 0);
    }

    #[test]
    fn test_aged_survivors_killed() {
        let engine = Engine::builder(template(), ones())
            .config(
                EngineConfig::default()
                    .with_max_phenotype_age(5)
                    .with_parallelism(Parallelism::Bounded(1)),
            )
            .build()
            .unwrap();
        let previous = random_population(&engine, 2);
        let mut rng = create_rng(42);
        // Every survivor was born in generation 0 and is now 10 generations old.
        let step = engine
            .evolve(&previous, 10, &mut rng, &Interrupt::none())
            .map(complete)
            .unwrap();
        let survivors = engine.config().survivor_count();
        assert_eq!(step.killed, survivors);
        // Survivors come first in the merged population.
        assert!(step
            .population
            .iter()
            .take(survivors)
            .all(|p| p.generation() == 10));
    }

    #[test]
    fn test_reseed_replaces_failures() {
        let fitness = FallibleFitnessFn::new(|g: &Genotype<BitChromosome>| {
            if g.first().count_ones() == 0 {
                Err("empty")
            } else {
                Ok(g.first().count_ones())
            }
        });
        let engine = Engine::builder(template(), fitness)
            .config(
                EngineConfig::default()
                    .with_parallelism(Parallelism::Bounded(1))
                    .with_failure_policy(FailurePolicy::Reseed { attempts: 5 }),
            )
            .build()
            .unwrap();
        let zero = Genotype::new(vec![BitChromosome::new(10, 0.5).unwrap()]).unwrap();
        let pop = Population::new(vec![Phenotype::new(zero, 0)]);
        let mut rng = create_rng(42);
        match engine.evaluate(pop, 0, &Interrupt::none(), &mut rng).unwrap() {
            Evaluated::Complete(p) => {
                assert!(p.is_evaluated());
                assert!(p.get(0).unwrap().fitness().unwrap() > 0);
            }
            Evaluated::Interrupted(_) => panic!("not interrupted"),
        }
    }

    #[test]
    fn test_reseed_attempts_count_rounds() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fitness = FallibleFitnessFn::new(move |_: &Genotype<BitChromosome>| -> Result<usize, String> {
            counter.fetch_add(1, Ordering::Relaxed);
            Err("always".to_string())
        });
        let engine = Engine::builder(template(), fitness)
            .config(
                EngineConfig::default()
                    .with_parallelism(Parallelism::Bounded(1))
                    .with_failure_policy(FailurePolicy::Reseed { attempts: 2 }),
            )
            .build()
            .unwrap();
        let mut rng = create_rng(3);
        let pop: Population<BitChromosome, usize> =
            (0..3).map(|_| engine.new_phenotype(0, &mut rng)).collect();
        let result = engine.evaluate(pop, 0, &Interrupt::none(), &mut rng);
        assert!(matches!(result, Err(EvolveError::Evaluation { .. })));
        // One initial pass plus two reseed rounds over all three individuals.
        assert_eq!(calls.load(Ordering::Relaxed), 9);
    }

    #[test]
    fn test_abort_reports_individual() {
        let fitness = FallibleFitnessFn::new(|_: &Genotype<BitChromosome>| -> Result<usize, String> {
            Err("always".to_string())
        });
        let engine = Engine::builder(template(), fitness)
            .config(EngineConfig::default().with_parallelism(Parallelism::Bounded(1)))
            .build()
            .unwrap();
        let mut rng = create_rng(1);
        let pop: Population<BitChromosome, usize> =
            (0..3).map(|_| engine.new_phenotype(4, &mut rng)).collect();
        let err = engine
            .evaluate(pop, 4, &Interrupt::none(), &mut rng)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            EvolveError::Evaluation {
                generation: 4,
                index: 0,
                ..
            }
        ));
    }
}
