//! Tracing point types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structure identifier attached to every SWC sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwcType {
    #[default]
    Undefined,
    Soma,
    Axon,
    Dendrite,
    ApicalDendrite,
    ForkPoint,
    EndPoint,
    Custom,
}

impl SwcType {
    /// All variants in code order.
    pub const ALL: [SwcType; 8] = [
        SwcType::Undefined,
        SwcType::Soma,
        SwcType::Axon,
        SwcType::Dendrite,
        SwcType::ApicalDendrite,
        SwcType::ForkPoint,
        SwcType::EndPoint,
        SwcType::Custom,
    ];

    /// Maps an SWC type code to a variant.
    ///
    /// Codes above 7 are user-defined structures and map to [`SwcType::Custom`].
    /// Negative codes have no meaning and yield `None`.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Undefined),
            1 => Some(Self::Soma),
            2 => Some(Self::Axon),
            3 => Some(Self::Dendrite),
            4 => Some(Self::ApicalDendrite),
            5 => Some(Self::ForkPoint),
            6 => Some(Self::EndPoint),
            c if c >= 7 => Some(Self::Custom),
            _ => None,
        }
    }

    /// Returns the canonical SWC code of this type.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Undefined => 0,
            Self::Soma => 1,
            Self::Axon => 2,
            Self::Dendrite => 3,
            Self::ApicalDendrite => 4,
            Self::ForkPoint => 5,
            Self::EndPoint => 6,
            Self::Custom => 7,
        }
    }

    /// Returns true for the topological markers (fork and end points).
    #[must_use]
    pub fn is_marker(self) -> bool {
        matches!(self, Self::ForkPoint | Self::EndPoint)
    }
}

impl fmt::Display for SwcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Soma => "soma",
            Self::Axon => "axon",
            Self::Dendrite => "dendrite",
            Self::ApicalDendrite => "apical dendrite",
            Self::ForkPoint => "fork point",
            Self::EndPoint => "end point",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A single labeled 3-D coordinate of a neuron trace.
///
/// Coordinates are in source file units after any caller-applied offset and
/// scale. Points are never mutated once built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TracingPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub swc_type: SwcType,
}

impl TracingPoint {
    /// Creates a new tracing point.
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, swc_type: SwcType) -> Self {
        Self { x, y, z, swc_type }
    }

    /// Creates an untyped point, mostly useful in tests.
    #[inline]
    #[must_use]
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, SwcType::Undefined)
    }

    /// Returns the coordinates as an array.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the unscaled voxel coordinate (unit spacing, rounded).
    ///
    /// Halves round towards positive infinity on every axis, so -0.5 lands
    /// on voxel 0.
    #[inline]
    #[must_use]
    pub fn voxel(&self) -> [i64; 3] {
        self.coords().map(round_half_up)
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn round_half_up(c: f64) -> i64 {
    (c + 0.5).floor() as i64
}
