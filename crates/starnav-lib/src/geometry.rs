//! Coordinate helpers for 3-D astrographic space.
//!
//! All positions share one distance unit (light-years in practice). Nothing here
//! validates inputs: NaN or infinite coordinates propagate into the result and
//! must be rejected upstream by whoever owns the catalog.

use serde::{Deserialize, Serialize};

/// Euclidean distance between two points given as `[x, y, z]`.
///
/// Symmetric, non-negative, and zero exactly when the points are equal
/// component-wise.
pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Squared Euclidean distance, used where only comparisons are needed.
pub fn distance_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Cartesian coordinates for a star.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(self.coords(), other.coords())
    }

    /// Coordinates as a fixed-size array.
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Position {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Position> for [f64; 3] {
    fn from(value: Position) -> Self {
        value.coords()
    }
}
