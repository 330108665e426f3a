//! Fitness boundary between the engine and the problem.
//!
//! The problem is an opaque [`FitnessFunction`]: one operation mapping a
//! genotype to a fitness value. The engine never inspects it beyond calling
//! it, and treats every error it returns as a failed evaluation.

use crate::error::FitnessError;
use crate::genetic::{Chromosome, Genotype};
use std::cmp::Ordering;

/// Marker trait for fitness values.
///
/// Fitness must support comparison and be cheaply copyable. The direction
/// (minimize or maximize) is given separately by [`Optimize`].
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the fitness to `f64` for weighting, limits, and logging.
    fn to_f64(self) -> f64;
}

macro_rules! impl_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_fitness!(f64, f32, i32, i64, u32, u64, usize);

/// Optimization direction.
///
/// Unevaluated phenotypes always compare as worse than evaluated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Optimize {
    /// Lower fitness is better.
    Minimum,
    /// Higher fitness is better.
    #[default]
    Maximum,
}

impl Optimize {
    /// Compares two fitness values; `Greater` means `a` is better.
    ///
    /// Incomparable values (NaN) compare as equal.
    pub fn compare<F: Fitness>(self, a: F, b: F) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Optimize::Maximum => ord,
            Optimize::Minimum => ord.reverse(),
        }
    }

    /// Like [`compare`](Self::compare), ranking `None` below any value.
    pub fn compare_option<F: Fitness>(self, a: Option<F>, b: Option<F>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better<F: Fitness>(self, a: Option<F>, b: Option<F>) -> bool {
        self.compare_option(a, b) == Ordering::Greater
    }

    /// Returns `true` if `value` meets or beats `target`.
    pub fn reaches(self, value: f64, target: f64) -> bool {
        match self {
            Optimize::Maximum => value >= target,
            Optimize::Minimum => value <= target,
        }
    }
}

/// The user-supplied quality measure.
///
/// Must be a pure function of the genotype for seeded runs to be
/// reproducible. It may be slow and is called concurrently from the
/// evaluation pool.
pub trait FitnessFunction<C: Chromosome, F: Fitness>: Send + Sync {
    /// # Errors
    /// Any error marks this individual's evaluation as failed.
    fn evaluate(&self, genotype: &Genotype<C>) -> Result<F, FitnessError>;
}

/// Adapts an infallible closure.
///
/// ```
/// use u_evolve::engine::FitnessFn;
/// use u_evolve::genetic::{BitChromosome, Genotype};
///
/// let ones = FitnessFn::new(|g: &Genotype<BitChromosome>| g.first().count_ones());
/// # let _ = ones;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitnessFn<Func>(Func);

impl<Func> FitnessFn<Func> {
    pub fn new(function: Func) -> Self {
        FitnessFn(function)
    }
}

impl<C, F, Func> FitnessFunction<C, F> for FitnessFn<Func>
where
    C: Chromosome,
    F: Fitness,
    Func: Fn(&Genotype<C>) -> F + Send + Sync,
{
    fn evaluate(&self, genotype: &Genotype<C>) -> Result<F, FitnessError> {
        Ok((self.0)(genotype))
    }
}

/// Adapts a closure returning `Result`.
#[derive(Debug, Clone, Copy)]
pub struct FallibleFitnessFn<Func>(Func);

impl<Func> FallibleFitnessFn<Func> {
    pub fn new(function: Func) -> Self {
        FallibleFitnessFn(function)
    }
}

impl<C, F, E, Func> FitnessFunction<C, F> for FallibleFitnessFn<Func>
where
    C: Chromosome,
    F: Fitness,
    E: Into<FitnessError>,
    Func: Fn(&Genotype<C>) -> Result<F, E> + Send + Sync,
{
    fn evaluate(&self, genotype: &Genotype<C>) -> Result<F, FitnessError> {
        (self.0)(genotype).map_err(Into::into)
    }
}
