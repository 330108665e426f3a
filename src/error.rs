//! Error taxonomy.
//!
//! - [`EncodingError`]: an invalid gene, chromosome, or genotype was requested.
//! - [`ConfigError`]: an engine parameter is out of range. Raised while the
//!   engine is built, never while it runs.
//! - [`EvolveError`]: anything that ends an evolution stream with a failure.
//!
//! Cancellation and timeouts are not errors; see
//! [`StopReason`](crate::engine::StopReason).

use thiserror::Error;

/// Error returned by a user fitness function.
pub type FitnessError = Box<dyn std::error::Error + Send + Sync>;

/// A fitness function panicked. Carries the panic message if it was a string.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("fitness function panicked: {0}")]
pub struct FitnessPanic(pub String);

/// Invalid construction of a genetic structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("chromosome must contain at least one gene")]
    EmptyChromosome,

    #[error("genotype must contain at least one chromosome")]
    EmptyGenotype,

    #[error("invalid domain: min {min} is not below max {max}")]
    InvalidDomain { min: f64, max: f64 },

    #[error("gene {index} is outside its domain: {value}")]
    OutOfDomain { index: usize, value: String },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("chromosome is not a permutation of 0..{length}")]
    NotAPermutation { length: usize },

    #[error("chromosome {index} fails validation")]
    InvalidChromosome { index: usize },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("expected a `{expected}` record, found `{found}`")]
    UnexpectedKind { expected: String, found: String },

    #[error("malformed tagged value: {0}")]
    Malformed(String),
}

/// Invalid engine, selector, or alterer parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1, got {0}")]
    PopulationSize(usize),

    #[error("offspring_fraction must be in (0, 1], got {0}")]
    OffspringFraction(f64),

    #[error("{name} probability must be in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("parallelism bound must be at least 1")]
    Parallelism,

    #[error("tournament size must be at least 1")]
    TournamentSize,

    #[error("max_phenotype_age must be at least 1")]
    PhenotypeAge,

    #[error("multi-point crossover needs at least one point")]
    CrossoverPoints,

    #[error("{0} must be positive or None")]
    Limit(&'static str),

    #[error("reseed policy needs at least one attempt")]
    ReseedAttempts,
}

/// Terminal failure of an evolution stream.
#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("fitness evaluation failed for individual {index} of generation {generation}: {source}")]
    Evaluation {
        generation: u64,
        index: usize,
        #[source]
        source: FitnessError,
    },

    #[error("cannot build evaluation thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EvolveError>;
