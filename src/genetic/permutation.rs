//! Permutation encoding.

use super::gene::EnumGene;
use super::types::{Chromosome, Gene};
use crate::error::EncodingError;
use crate::random::{shuffle, EvolveRng};
use rand::Rng;

/// A bijection over `0..n`, stored as a sequence of [`EnumGene`]s.
///
/// Every construction path validates that each index occurs exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationChromosome {
    genes: Vec<EnumGene>,
}

impl PermutationChromosome {
    /// Creates the identity permutation of `length` indices.
    pub fn new(length: usize) -> Result<Self, EncodingError> {
        let indices: Vec<usize> = (0..length).collect();
        Self::of(&indices)
    }

    /// Creates a chromosome from an explicit ordering of `0..indices.len()`.
    pub fn of(indices: &[usize]) -> Result<Self, EncodingError> {
        let length = indices.len();
        if length == 0 {
            return Err(EncodingError::EmptyChromosome);
        }
        if !is_permutation(indices.iter().copied(), length) {
            return Err(EncodingError::NotAPermutation { length });
        }
        let genes = indices
            .iter()
            .map(|&i| EnumGene::new(i, length))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PermutationChromosome { genes })
    }

    pub fn random(length: usize, rng: &mut EvolveRng) -> Result<Self, EncodingError> {
        Ok(Self::new(length)?.new_instance(rng))
    }

    /// Returns the permutation as plain indices.
    pub fn indices(&self) -> Vec<usize> {
        self.genes.iter().map(EnumGene::allele).collect()
    }
}

/// Returns `true` if `values` contains each of `0..n` exactly once.
pub(crate) fn is_permutation(values: impl Iterator<Item = usize>, n: usize) -> bool {
    let mut seen = vec![false; n];
    let mut count = 0;
    for v in values {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
        count += 1;
    }
    count == n
}

impl Chromosome for PermutationChromosome {
    type Gene = EnumGene;

    fn genes(&self) -> &[EnumGene] {
        &self.genes
    }

    fn is_valid(&self) -> bool {
        let n = self.genes.len();
        n > 0
            && self.genes.iter().all(|g| g.is_valid() && g.length() == n)
            && is_permutation(self.genes.iter().map(EnumGene::allele), n)
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        let mut genes = self.genes.clone();
        shuffle(&mut genes, rng);
        PermutationChromosome { genes }
    }

    fn with_genes(&self, genes: Vec<EnumGene>) -> Result<Self, EncodingError> {
        let chromosome = PermutationChromosome { genes };
        if chromosome.genes.is_empty() {
            return Err(EncodingError::EmptyChromosome);
        }
        if chromosome.genes.len() != self.genes.len() {
            return Err(EncodingError::LengthMismatch {
                expected: self.genes.len(),
                actual: chromosome.genes.len(),
            });
        }
        if !chromosome.is_valid() {
            return Err(EncodingError::NotAPermutation {
                length: self.genes.len(),
            });
        }
        Ok(chromosome)
    }

    /// Swap mutation: each position is, with `probability`, exchanged with a
    /// uniformly drawn position. The result is always a permutation.
    fn mutate(&self, probability: f64, rng: &mut EvolveRng) -> Option<(Self, usize)> {
        let n = self.genes.len();
        if n < 2 {
            return None;
        }
        let mut genes = self.genes.clone();
        for i in 0..n {
            if rng.random::<f64>() < probability {
                let j = rng.random_range(0..n);
                genes.swap(i, j);
            }
        }
        let altered = genes
            .iter()
            .zip(&self.genes)
            .filter(|(a, b)| a != b)
            .count();
        if altered == 0 {
            return None;
        }
        Some((PermutationChromosome { genes }, altered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_identity() {
        let c = PermutationChromosome::new(5).unwrap();
        assert_eq!(c.indices(), vec![0, 1, 2, 3, 4]);
        assert!(c.is_valid());
    }

    #[test]
    fn test_rejects_duplicates_and_gaps() {
        assert_eq!(
            PermutationChromosome::of(&[0, 1, 1]),
            Err(EncodingError::NotAPermutation { length: 3 })
        );
        assert_eq!(
            PermutationChromosome::of(&[0, 1, 3]),
            Err(EncodingError::NotAPermutation { length: 3 })
        );
        assert_eq!(
            PermutationChromosome::of(&[]),
            Err(EncodingError::EmptyChromosome)
        );
    }

    #[test]
    fn test_with_genes_rejects_broken_permutation() {
        let c = PermutationChromosome::new(3).unwrap();
        let g = c.genes()[0];
        assert!(c.with_genes(vec![g, g, g]).is_err());
    }

    #[test]
    fn test_mutate_stays_bijective() {
        let mut rng = create_rng(42);
        let c = PermutationChromosome::random(30, &mut rng).unwrap();
        for _ in 0..100 {
            if let Some((m, altered)) = c.mutate(0.2, &mut rng) {
                assert!(m.is_valid());
                assert!(altered >= 2);
            }
        }
    }

    #[test]
    fn test_large_factory_instances_are_valid() {
        let mut rng = create_rng(100);
        let template = PermutationChromosome::new(100).unwrap();
        for _ in 0..50 {
            let c = template.new_instance(&mut rng);
            assert!(c.is_valid());
            assert_eq!(c.len(), 100);
        }
    }

    proptest! {
        #[test]
        fn prop_new_instance_is_permutation(length in 1usize..200, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let c = PermutationChromosome::new(length).unwrap().new_instance(&mut rng);
            prop_assert!(c.is_valid());
            let mut sorted = c.indices();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..length).collect::<Vec<_>>());
        }
    }
}
