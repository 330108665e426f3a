//! Bounded integer and real encodings.

use super::gene::{check_double_domain, check_integer_domain, DoubleGene, IntegerGene};
use super::types::{Chromosome, Gene};
use crate::error::EncodingError;
use crate::random::EvolveRng;

/// A sequence of integers sharing the inclusive domain `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerChromosome {
    genes: Vec<IntegerGene>,
    min: i64,
    max: i64,
}

impl IntegerChromosome {
    /// Creates a template of `length` genes, all set to `min`.
    pub fn new(min: i64, max: i64, length: usize) -> Result<Self, EncodingError> {
        Self::of(min, max, &vec![min; length])
    }

    /// Creates a chromosome from explicit values.
    pub fn of(min: i64, max: i64, values: &[i64]) -> Result<Self, EncodingError> {
        check_integer_domain(min, max)?;
        if values.is_empty() {
            return Err(EncodingError::EmptyChromosome);
        }
        let genes = values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                IntegerGene::new(v, min, max).map_err(|_| EncodingError::OutOfDomain {
                    index,
                    value: v.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IntegerChromosome { genes, min, max })
    }

    pub fn random(
        min: i64,
        max: i64,
        length: usize,
        rng: &mut EvolveRng,
    ) -> Result<Self, EncodingError> {
        Ok(Self::new(min, max, length)?.new_instance(rng))
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn values(&self) -> Vec<i64> {
        self.genes.iter().map(IntegerGene::value).collect()
    }
}

impl Chromosome for IntegerChromosome {
    type Gene = IntegerGene;

    fn genes(&self) -> &[IntegerGene] {
        &self.genes
    }

    fn is_valid(&self) -> bool {
        !self.genes.is_empty()
            && self
                .genes
                .iter()
                .all(|g| g.is_valid() && g.min() == self.min && g.max() == self.max)
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        IntegerChromosome {
            genes: self.genes.iter().map(|g| g.new_instance(rng)).collect(),
            min: self.min,
            max: self.max,
        }
    }

    fn with_genes(&self, genes: Vec<IntegerGene>) -> Result<Self, EncodingError> {
        let chromosome = IntegerChromosome {
            genes,
            min: self.min,
            max: self.max,
        };
        validate_genes(&chromosome)?;
        Ok(chromosome)
    }
}

/// A sequence of finite reals sharing the half-open domain `[min, max)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleChromosome {
    genes: Vec<DoubleGene>,
    min: f64,
    max: f64,
}

impl DoubleChromosome {
    /// Creates a template of `length` genes, all set to `min`.
    pub fn new(min: f64, max: f64, length: usize) -> Result<Self, EncodingError> {
        Self::of(min, max, &vec![min; length])
    }

    pub fn of(min: f64, max: f64, values: &[f64]) -> Result<Self, EncodingError> {
        check_double_domain(min, max)?;
        if values.is_empty() {
            return Err(EncodingError::EmptyChromosome);
        }
        let genes = values
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                DoubleGene::new(v, min, max).map_err(|_| EncodingError::OutOfDomain {
                    index,
                    value: v.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DoubleChromosome { genes, min, max })
    }

    pub fn random(
        min: f64,
        max: f64,
        length: usize,
        rng: &mut EvolveRng,
    ) -> Result<Self, EncodingError> {
        Ok(Self::new(min, max, length)?.new_instance(rng))
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn values(&self) -> Vec<f64> {
        self.genes.iter().map(DoubleGene::value).collect()
    }
}

impl Chromosome for DoubleChromosome {
    type Gene = DoubleGene;

    fn genes(&self) -> &[DoubleGene] {
        &self.genes
    }

    fn is_valid(&self) -> bool {
        !self.genes.is_empty()
            && self
                .genes
                .iter()
                .all(|g| g.is_valid() && g.min() == self.min && g.max() == self.max)
    }

    fn new_instance(&self, rng: &mut EvolveRng) -> Self {
        DoubleChromosome {
            genes: self.genes.iter().map(|g| g.new_instance(rng)).collect(),
            min: self.min,
            max: self.max,
        }
    }

    fn with_genes(&self, genes: Vec<DoubleGene>) -> Result<Self, EncodingError> {
        let chromosome = DoubleChromosome {
            genes,
            min: self.min,
            max: self.max,
        };
        validate_genes(&chromosome)?;
        Ok(chromosome)
    }
}

fn validate_genes<C: Chromosome>(chromosome: &C) -> Result<(), EncodingError> {
    if chromosome.is_empty() {
        return Err(EncodingError::EmptyChromosome);
    }
    if chromosome.is_valid() {
        return Ok(());
    }
    // Report the first offending position.
    let index = chromosome
        .genes()
        .iter()
        .position(|g| !g.is_valid())
        .unwrap_or(0);
    Err(EncodingError::OutOfDomain {
        index,
        value: format!("{:?}", chromosome.genes()[index]),
    })
}
