//! Concrete gene kinds.

use super::types::{Gene, Mean};
use crate::error::EncodingError;
use crate::random::EvolveRng;
use rand::Rng;

/// A single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitGene(bool);

impl BitGene {
    pub const TRUE: BitGene = BitGene(true);
    pub const FALSE: BitGene = BitGene(false);

    pub fn new(bit: bool) -> Self {
        BitGene(bit)
    }

    pub fn bit(self) -> bool {
        self.0
    }

    /// Returns the gene with the opposite value.
    pub fn flip(self) -> Self {
        BitGene(!self.0)
    }
}

impl Gene for BitGene {
    fn is_valid(&self) -> bool {
        true
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        BitGene(rng.random_bool(0.5))
    }
}

/// An integer from the inclusive range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerGene {
    value: i64,
    min: i64,
    max: i64,
}

impl IntegerGene {
    /// Creates a gene, rejecting values outside `[min, max]`.
    pub fn new(value: i64, min: i64, max: i64) -> Result<Self, EncodingError> {
        check_integer_domain(min, max)?;
        let gene = IntegerGene { value, min, max };
        if !gene.is_valid() {
            return Err(EncodingError::OutOfDomain {
                index: 0,
                value: value.to_string(),
            });
        }
        Ok(gene)
    }

    /// Creates a random gene from `[min, max]`.
    pub fn random(min: i64, max: i64, rng: &mut EvolveRng) -> Result<Self, EncodingError> {
        check_integer_domain(min, max)?;
        Ok(IntegerGene {
            value: rng.random_range(min..=max),
            min,
            max,
        })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub(crate) fn with_value(&self, value: i64) -> Self {
        IntegerGene { value, ..*self }
    }
}

pub(crate) fn check_integer_domain(min: i64, max: i64) -> Result<(), EncodingError> {
    if min > max {
        return Err(EncodingError::InvalidDomain {
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

impl Gene for IntegerGene {
    fn is_valid(&self) -> bool {
        (self.min..=self.max).contains(&self.value)
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        self.with_value(rng.random_range(self.min..=self.max))
    }
}

impl Mean for IntegerGene {
    fn mean(&self, other: &Self) -> Self {
        let mean = ((self.value as i128 + other.value as i128) / 2) as i64;
        self.with_value(mean.clamp(self.min, self.max))
    }
}

/// A finite real number from the half-open range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleGene {
    value: f64,
    min: f64,
    max: f64,
}

impl DoubleGene {
    /// Creates a gene, rejecting values outside `[min, max)`.
    pub fn new(value: f64, min: f64, max: f64) -> Result<Self, EncodingError> {
        check_double_domain(min, max)?;
        let gene = DoubleGene { value, min, max };
        if !gene.is_valid() {
            return Err(EncodingError::OutOfDomain {
                index: 0,
                value: value.to_string(),
            });
        }
        Ok(gene)
    }

    /// Creates a random gene from `[min, max)`.
    pub fn random(min: f64, max: f64, rng: &mut EvolveRng) -> Result<Self, EncodingError> {
        check_double_domain(min, max)?;
        Ok(DoubleGene {
            value: rng.random_range(min..max),
            min,
            max,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub(crate) fn with_value(&self, value: f64) -> Self {
        DoubleGene { value, ..*self }
    }
}

pub(crate) fn check_double_domain(min: f64, max: f64) -> Result<(), EncodingError> {
    if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
        return Err(EncodingError::InvalidDomain { min, max });
    }
    Ok(())
}

impl Gene for DoubleGene {
    fn is_valid(&self) -> bool {
        self.value.is_finite() && self.value >= self.min && self.value < self.max
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        self.with_value(rng.random_range(self.min..self.max))
    }
}

impl Mean for DoubleGene {
    fn mean(&self, other: &Self) -> Self {
        let mean = self.value + (other.value - self.value) / 2.0;
        let candidate = self.with_value(mean);
        if candidate.is_valid() {
            candidate
        } else {
            *self
        }
    }
}

/// An index token of a permutation over `0..length`.
///
/// A single `EnumGene` is valid whenever `allele < length`; uniqueness across
/// the sequence is enforced by
/// [`PermutationChromosome`](super::PermutationChromosome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumGene {
    allele: usize,
    length: usize,
}

impl EnumGene {
    pub fn new(allele: usize, length: usize) -> Result<Self, EncodingError> {
        if allele >= length {
            return Err(EncodingError::IndexOutOfRange {
                index: allele,
                length,
            });
        }
        Ok(EnumGene { allele, length })
    }

    pub fn allele(&self) -> usize {
        self.allele
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Gene for EnumGene {
    fn is_valid(&self) -> bool {
        self.allele < self.length
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        EnumGene {
            allele: rng.random_range(0..self.length),
            length: self.length,
        }
    }
}
