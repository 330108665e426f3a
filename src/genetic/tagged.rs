//! Nested tagged-value form of genotypes.
//!
//! Every structure maps to a record `{kind, attributes, children}`; genes map
//! to scalar leaves. Serializers (XML, JSON, ...) live outside this crate and
//! only need [`Tagged::to_tagged`] and [`Tagged::from_tagged`]. Decoding runs
//! the same validation as direct construction.
//!
//! | kind                     | attributes           | children |
//! |--------------------------|----------------------|----------|
//! | `genotype`               | (none)               | chromosome records |
//! | `bit-chromosome`         | `one-probability`    | `Bool` |
//! | `integer-chromosome`     | `min`, `max`         | `Int` |
//! | `double-chromosome`      | `min`, `max`         | `Float` |
//! | `permutation-chromosome` | `length`             | `Index` |

use super::bit::BitChromosome;
use super::gene::BitGene;
use super::genotype::Genotype;
use super::numeric::{DoubleChromosome, IntegerChromosome};
use super::permutation::PermutationChromosome;
use super::types::Chromosome;
use crate::error::EncodingError;
use std::collections::BTreeMap;

pub const GENOTYPE: &str = "genotype";
pub const BIT_CHROMOSOME: &str = "bit-chromosome";
pub const INTEGER_CHROMOSOME: &str = "integer-chromosome";
pub const DOUBLE_CHROMOSOME: &str = "double-chromosome";
pub const PERMUTATION_CHROMOSOME: &str = "permutation-chromosome";

/// A leaf value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Index(usize),
}

impl Scalar {
    fn as_bool(&self) -> Result<bool, EncodingError> {
        match *self {
            Scalar::Bool(b) => Ok(b),
            other => Err(mismatch("Bool", other)),
        }
    }

    fn as_int(&self) -> Result<i64, EncodingError> {
        match *self {
            Scalar::Int(i) => Ok(i),
            other => Err(mismatch("Int", other)),
        }
    }

    fn as_float(&self) -> Result<f64, EncodingError> {
        match *self {
            Scalar::Float(f) => Ok(f),
            other => Err(mismatch("Float", other)),
        }
    }

    fn as_index(&self) -> Result<usize, EncodingError> {
        match *self {
            Scalar::Index(i) => Ok(i),
            other => Err(mismatch("Index", other)),
        }
    }
}

fn mismatch(expected: &str, found: Scalar) -> EncodingError {
    EncodingError::Malformed(format!("expected {expected} scalar, found {found:?}"))
}

/// A genotype, chromosome, or gene in decomposed form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaggedValue {
    Scalar(Scalar),
    Record {
        kind: String,
        attributes: BTreeMap<String, Scalar>,
        children: Vec<TaggedValue>,
    },
}

impl TaggedValue {
    pub fn record(
        kind: &str,
        attributes: impl IntoIterator<Item = (&'static str, Scalar)>,
        children: Vec<TaggedValue>,
    ) -> Self {
        TaggedValue::Record {
            kind: kind.to_string(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            children,
        }
    }

    /// Returns the kind of a record, or `None` for a scalar.
    pub fn kind(&self) -> Option<&str> {
        match self {
            TaggedValue::Record { kind, .. } => Some(kind),
            TaggedValue::Scalar(_) => None,
        }
    }

    fn expect_record(&self, expected: &str) -> Result<Record<'_>, EncodingError> {
        match self {
            TaggedValue::Record {
                kind,
                attributes,
                children,
            } if kind == expected => Ok(Record {
                attributes,
                children,
            }),
            TaggedValue::Record { kind, .. } => Err(EncodingError::UnexpectedKind {
                expected: expected.to_string(),
                found: kind.clone(),
            }),
            TaggedValue::Scalar(s) => Err(EncodingError::UnexpectedKind {
                expected: expected.to_string(),
                found: format!("{s:?}"),
            }),
        }
    }
}

struct Record<'a> {
    attributes: &'a BTreeMap<String, Scalar>,
    children: &'a [TaggedValue],
}

impl Record<'_> {
    fn attribute(&self, name: &str) -> Result<&Scalar, EncodingError> {
        self.attributes
            .get(name)
            .ok_or_else(|| EncodingError::Malformed(format!("missing attribute `{name}`")))
    }

    fn scalars<T>(
        &self,
        read: impl Fn(&Scalar) -> Result<T, EncodingError>,
    ) -> Result<Vec<T>, EncodingError> {
        self.children
            .iter()
            .map(|child| match child {
                TaggedValue::Scalar(s) => read(s),
                TaggedValue::Record { kind, .. } => Err(EncodingError::Malformed(format!(
                    "expected scalar gene, found `{kind}` record"
                ))),
            })
            .collect()
    }
}

/// Conversion to and from the nested tagged-value form.
pub trait Tagged: Sized {
    fn to_tagged(&self) -> TaggedValue;

    /// # Errors
    /// Returns an [`EncodingError`] if the value has the wrong shape or
    /// describes an invalid structure.
    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError>;
}

impl Tagged for BitChromosome {
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::record(
            BIT_CHROMOSOME,
            [("one-probability", Scalar::Float(self.one_probability()))],
            self.bits().map(|b| TaggedValue::Scalar(Scalar::Bool(b))).collect(),
        )
    }

    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError> {
        let record = value.expect_record(BIT_CHROMOSOME)?;
        let p = record.attribute("one-probability")?.as_float()?;
        let genes: Vec<BitGene> = record
            .scalars(Scalar::as_bool)?
            .into_iter()
            .map(BitGene::new)
            .collect();
        BitChromosome::new(genes.len(), p)?.with_genes(genes)
    }
}

impl Tagged for IntegerChromosome {
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::record(
            INTEGER_CHROMOSOME,
            [("min", Scalar::Int(self.min())), ("max", Scalar::Int(self.max()))],
            self.values()
                .into_iter()
                .map(|v| TaggedValue::Scalar(Scalar::Int(v)))
                .collect(),
        )
    }

    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError> {
        let record = value.expect_record(INTEGER_CHROMOSOME)?;
        let min = record.attribute("min")?.as_int()?;
        let max = record.attribute("max")?.as_int()?;
        IntegerChromosome::of(min, max, &record.scalars(Scalar::as_int)?)
    }
}

impl Tagged for DoubleChromosome {
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::record(
            DOUBLE_CHROMOSOME,
            [
                ("min", Scalar::Float(self.min())),
                ("max", Scalar::Float(self.max())),
            ],
            self.values()
                .into_iter()
                .map(|v| TaggedValue::Scalar(Scalar::Float(v)))
                .collect(),
        )
    }

    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError> {
        let record = value.expect_record(DOUBLE_CHROMOSOME)?;
        let min = record.attribute("min")?.as_float()?;
        let max = record.attribute("max")?.as_float()?;
        DoubleChromosome::of(min, max, &record.scalars(Scalar::as_float)?)
    }
}

impl Tagged for PermutationChromosome {
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::record(
            PERMUTATION_CHROMOSOME,
            [("length", Scalar::Index(self.len()))],
            self.indices()
                .into_iter()
                .map(|i| TaggedValue::Scalar(Scalar::Index(i)))
                .collect(),
        )
    }

    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError> {
        let record = value.expect_record(PERMUTATION_CHROMOSOME)?;
        let length = record.attribute("length")?.as_index()?;
        let indices = record.scalars(Scalar::as_index)?;
        if indices.len() != length {
            return Err(EncodingError::LengthMismatch {
                expected: length,
                actual: indices.len(),
            });
        }
        PermutationChromosome::of(&indices)
    }
}

impl<C: Chromosome + Tagged> Tagged for Genotype<C> {
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::record(
            GENOTYPE,
            std::iter::empty(),
            self.iter().map(Tagged::to_tagged).collect(),
        )
    }

    fn from_tagged(value: &TaggedValue) -> Result<Self, EncodingError> {
        let record = value.expect_record(GENOTYPE)?;
        let chromosomes = record
            .children
            .iter()
            .map(C::from_tagged)
            .collect::<Result<Vec<_>, _>>()?;
        Genotype::new(chromosomes)
    }
}
