//! Capability traits shared by every encoding.
//!
//! Selectors, alterers, and the engine only ever see these traits, so one
//! operator implementation covers bit, integer, real, and permutation
//! chromosomes alike.

use crate::error::EncodingError;
use crate::random::EvolveRng;
use rand::Rng;
use std::fmt;

/// The smallest unit of a genetic encoding.
///
/// Genes are immutable values. Operators never modify a gene; they replace
/// it with a new one produced by [`new_instance`](Gene::new_instance).
pub trait Gene: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Returns `true` if the gene's value lies inside its domain.
    fn is_valid(&self) -> bool;

    /// Creates a new random gene from the same domain.
    fn new_instance(&self, rng: &mut EvolveRng) -> Self;
}

/// Genes that support arithmetic recombination.
pub trait Mean: Gene {
    /// Returns a gene holding the mean of both values, inside `self`'s domain.
    fn mean(&self, other: &Self) -> Self;
}

/// An ordered, validity-constrained sequence of genes of one kind.
///
/// # Implementing
///
/// A representation must guarantee that every value it hands out passes
/// [`is_valid`](Chromosome::is_valid). Construction paths that could break
/// the representation invariant go through
/// [`with_genes`](Chromosome::with_genes), which rejects invalid sequences
/// instead of coercing them.
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq)]
/// struct Signs { genes: Vec<BitGene> }
///
/// impl Chromosome for Signs {
///     type Gene = BitGene;
///     fn genes(&self) -> &[BitGene] { &self.genes }
///     fn is_valid(&self) -> bool { !self.genes.is_empty() }
///     fn new_instance(&self, rng: &mut EvolveRng) -> Self {
///         Signs { genes: self.genes.iter().map(|g| g.new_instance(rng)).collect() }
///     }
///     fn with_genes(&self, genes: Vec<BitGene>) -> Result<Self, EncodingError> {
///         if genes.is_empty() { return Err(EncodingError::EmptyChromosome); }
///         Ok(Signs { genes })
///     }
/// }
/// ```
pub trait Chromosome: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The gene kind stored in this chromosome.
    type Gene: Gene;

    /// Returns the genes in order.
    fn genes(&self) -> &[Self::Gene];

    /// Returns `true` if every gene is valid and the representation
    /// invariant holds.
    fn is_valid(&self) -> bool;

    /// Creates a new random valid chromosome with the same length and domain.
    fn new_instance(&self, rng: &mut EvolveRng) -> Self;

    /// Builds a chromosome of the same kind and domain from `genes`.
    ///
    /// # Errors
    /// Returns an [`EncodingError`] if the genes do not form a valid
    /// chromosome of this representation.
    fn with_genes(&self, genes: Vec<Self::Gene>) -> Result<Self, EncodingError>;

    /// Number of genes.
    fn len(&self) -> usize {
        self.genes().len()
    }

    /// Always `false` for a constructed chromosome.
    fn is_empty(&self) -> bool {
        self.genes().is_empty()
    }

    /// Returns the gene at `index`.
    fn gene(&self, index: usize) -> Option<&Self::Gene> {
        self.genes().get(index)
    }

    /// Mutates each gene independently with `probability`.
    ///
    /// Returns the mutated chromosome together with the number of genes whose
    /// value changed, or `None` if nothing changed. One `f64` is drawn per
    /// gene, in order, followed by the draws of any replacement.
    ///
    /// The default replaces the gene with [`Gene::new_instance`].
    /// Representations with cross-gene constraints override this so the
    /// result stays valid.
    fn mutate(&self, probability: f64, rng: &mut EvolveRng) -> Option<(Self, usize)> {
        let mut altered = 0;
        let genes: Vec<Self::Gene> = self
            .genes()
            .iter()
            .map(|gene| {
                if rng.random::<f64>() < probability {
                    let replacement = gene.new_instance(rng);
                    if replacement != *gene {
                        altered += 1;
                    }
                    replacement
                } else {
                    gene.clone()
                }
            })
            .collect();

        if altered == 0 {
            return None;
        }
        self.with_genes(genes).ok().map(|c| (c, altered))
    }
}
