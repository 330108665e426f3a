//! Genetic data model.
//!
//! Leaves first:
//!
//! - [`Gene`]: an immutable value from a fixed domain ([`BitGene`],
//!   [`IntegerGene`], [`DoubleGene`], [`EnumGene`])
//! - [`Chromosome`]: a non-empty, validity-constrained sequence of one gene
//!   kind ([`BitChromosome`], [`IntegerChromosome`], [`DoubleChromosome`],
//!   [`PermutationChromosome`])
//! - [`Genotype`]: the chromosomes of one candidate solution
//! - [`Phenotype`]: a genotype with its birth generation and fitness
//! - [`Population`]: the phenotypes of one generation
//!
//! All of them are values. Operators build new instances rather than
//! mutating existing ones. [`tagged`] provides the decomposed form used by
//! external serializers.

mod bit;
mod gene;
mod genotype;
mod numeric;
mod permutation;
mod phenotype;
pub mod tagged;
mod types;

pub use bit::BitChromosome;
pub use gene::{BitGene, DoubleGene, EnumGene, IntegerGene};
pub use genotype::Genotype;
pub use numeric::{DoubleChromosome, IntegerChromosome};
pub use permutation::PermutationChromosome;
#[cfg(test)]
pub(crate) use permutation::is_permutation;
pub use phenotype::{Phenotype, Population};
pub use tagged::{Scalar, Tagged, TaggedValue};
pub use types::{Chromosome, Gene, Mean};
