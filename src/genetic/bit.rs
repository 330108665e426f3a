//! Bit-string encoding.

use super::gene::BitGene;
use super::types::Chromosome;
use crate::error::EncodingError;
use crate::random::EvolveRng;
use rand::Rng;

/// A fixed-length sequence of bits.
///
/// `one_probability` is the probability that [`new_instance`](Chromosome::new_instance)
/// sets a bit.
#[derive(Debug, Clone, PartialEq)]
pub struct BitChromosome {
    genes: Vec<BitGene>,
    one_probability: f64,
}

impl BitChromosome {
    /// Creates an all-zero template of `length` bits.
    pub fn new(length: usize, one_probability: f64) -> Result<Self, EncodingError> {
        Self::from_genes(vec![BitGene::FALSE; length], one_probability)
    }

    /// Creates a chromosome from explicit bits, with `one_probability = 0.5`.
    pub fn of(bits: &[bool]) -> Result<Self, EncodingError> {
        Self::from_genes(bits.iter().map(|&b| BitGene::new(b)).collect(), 0.5)
    }

    /// Creates a random chromosome.
    pub fn random(
        length: usize,
        one_probability: f64,
        rng: &mut EvolveRng,
    ) -> Result<Self, EncodingError> {
        let template = Self::new(length, one_probability)?;
        Ok(template.new_instance(rng))
    }

    fn from_genes(genes: Vec<BitGene>, one_probability: f64) -> Result<Self, EncodingError> {
        if genes.is_empty() {
            return Err(EncodingError::EmptyChromosome);
        }
        if !(0.0..=1.0).contains(&one_probability) {
            return Err(EncodingError::InvalidProbability(one_probability));
        }
        Ok(BitChromosome {
            genes,
            one_probability,
        })
    }

    pub fn one_probability(&self) -> f64 {
        self.one_probability
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.genes.iter().filter(|g| g.bit()).count()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.genes.iter().map(|g| g.bit())
    }
}

impl Chromosome for BitChromosome {
    type Gene = BitGene;

    fn genes(&self) -> &[BitGene] {
        &self.genes
    }

    fn is_valid(&self) -> bool {
        !self.genes.is_empty()
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        let genes = (0..self.genes.len())
            .map(|_| BitGene::new(rng.random_bool(self.one_probability)))
            .collect();
        BitChromosome {
            genes,
            one_probability: self.one_probability,
        }
    }

    fn with_genes(&self, genes: Vec<BitGene>) -> Result<Self, EncodingError> {
        Self::from_genes(genes, self.one_probability)
    }

    /// Bit-flip mutation: every selected bit is inverted.
    fn mutate(&self, probability: f64, rng: &mut EvolveRng) -> Option<(Self, usize)> {
        let mut altered = 0;
        let genes: Vec<BitGene> = self
            .genes
            .iter()
            .map(|&gene| {
                if rng.random::<f64>() < probability {
                    altered += 1;
                    gene.flip()
                } else {
                    gene
                }
            })
            .collect();

        if altered == 0 {
            return None;
        }
        Some((
            BitChromosome {
                genes,
                one_probability: self.one_probability,
            },
            altered,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            BitChromosome::new(0, 0.5),
            Err(EncodingError::EmptyChromosome)
        );
        assert_eq!(BitChromosome::of(&[]), Err(EncodingError::EmptyChromosome));
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(BitChromosome::new(4, 1.5).is_err());
    }

    #[test]
    fn test_count_ones() {
        let c = BitChromosome::of(&[true, false, true, true]).unwrap();
        assert_eq!(c.count_ones(), 3);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_one_probability_extremes() {
        let mut rng = create_rng(42);
        let ones = BitChromosome::random(32, 1.0, &mut rng).unwrap();
        assert_eq!(ones.count_ones(), 32);
        let zeros = BitChromosome::random(32, 0.0, &mut rng).unwrap();
        assert_eq!(zeros.count_ones(), 0);
    }

    #[test]
    fn test_mutate_flips_all_with_probability_one() {
        let mut rng = create_rng(42);
        let c = BitChromosome::of(&[true, false, true]).unwrap();
        let (m, altered) = c.mutate(1.0, &mut rng).unwrap();
        assert_eq!(altered, 3);
        assert_eq!(m.bits().collect::<Vec<_>>(), vec![false, true, false]);
    }

    #[test]
    fn test_mutate_zero_probability_is_none() {
        let mut rng = create_rng(42);
        let c = BitChromosome::of(&[true, false]).unwrap();
        assert!(c.mutate(0.0, &mut rng).is_none());
    }
}
