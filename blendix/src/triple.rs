use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use mint::Vector3;
use serde::{Deserialize, Serialize};

use crate::{Error, MAX_SETS};

/// Numeric representation of the transmit side.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Int,
    Float,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Int => "int",
            Variant::Float => "float",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Variant::Int),
            "float" => Ok(Variant::Float),
            other => Err(Error::InvalidVariant(other.to_string())),
        }
    }
}

/// One (x, y, z) grouping, tagged with its representation.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub enum Triple {
    Int(Vector3<i32>),
    Float(Vector3<f32>),
}

impl Triple {
    pub fn variant(&self) -> Variant {
        match self {
            Triple::Int(_) => Variant::Int,
            Triple::Float(_) => Variant::Float,
        }
    }
}

impl From<Vector3<i32>> for Triple {
    fn from(v: Vector3<i32>) -> Self {
        Triple::Int(v)
    }
}

impl From<Vector3<f32>> for Triple {
    fn from(v: Vector3<f32>) -> Self {
        Triple::Float(v)
    }
}

impl From<(i32, i32, i32)> for Triple {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Triple::Int(Vector3 { x, y, z })
    }
}

impl From<(f32, f32, f32)> for Triple {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Triple::Float(Vector3 { x, y, z })
    }
}

/// Transmit storage. Always holds `MAX_SETS` triples of a single variant; only the
/// configured prefix goes on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum TransmitSet {
    Int([Vector3<i32>; MAX_SETS]),
    Float([Vector3<f32>; MAX_SETS]),
}

impl TransmitSet {
    pub fn zeroed(variant: Variant) -> Self {
        match variant {
            Variant::Int => TransmitSet::Int([Vector3::from([0; 3]); MAX_SETS]),
            Variant::Float => TransmitSet::Float([Vector3::from([0.0; 3]); MAX_SETS]),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            TransmitSet::Int(_) => Variant::Int,
            TransmitSet::Float(_) => Variant::Float,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::zeroed(self.variant());
    }

    /// Stores `triple` at the 0-based `index`.
    pub fn write(&mut self, index: usize, triple: Triple) -> Result<(), Error> {
        if index >= MAX_SETS {
            return Err(Error::InvalidSetIndex { index: index + 1, count: MAX_SETS });
        }

        match (self, triple) {
            (TransmitSet::Int(sets), Triple::Int(v)) => sets[index] = v,
            (TransmitSet::Float(sets), Triple::Float(v)) => sets[index] = v,
            (this, triple) => {
                return Err(Error::VariantMismatch {
                    active: this.variant(),
                    requested: triple.variant(),
                })
            }
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<Triple> {
        match self {
            TransmitSet::Int(sets) => sets.get(index).copied().map(Triple::Int),
            TransmitSet::Float(sets) => sets.get(index).copied().map(Triple::Float),
        }
    }
}

/// Triples recovered from the last successful decode.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ReceiveSet {
    sets: heapless::Vec<Vector3<f32>, MAX_SETS>,
}

impl ReceiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Vector3<f32>] {
        &self.sets
    }

    /// Groups `values` into triples in order. A trailing partial triple and anything past
    /// `MAX_SETS` triples is ignored.
    pub(crate) fn from_values(values: &[f32]) -> Self {
        let sets = values
            .chunks_exact(3)
            .take(MAX_SETS)
            .map(|v| Vector3 { x: v[0], y: v[1], z: v[2] })
            .collect();
        Self { sets }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.sets.truncate(len);
    }
}

impl Deref for ReceiveSet {
    type Target = [Vector3<f32>];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a ReceiveSet {
    type Item = &'a Vector3<f32>;
    type IntoIter = std::slice::Iter<'a, Vector3<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
