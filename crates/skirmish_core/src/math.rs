//! Fixed-point math utilities for deterministic decisions.
//!
//! All range and proximity checks use fixed-point arithmetic so the
//! same battlefield snapshot always yields the same decisions,
//! regardless of platform.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all positional math.
///
/// 32 bits of integer, 32 bits of fraction. Arena coordinates are small
/// integers, so the range is far more than needed; the point is exactness.
pub type Fixed = I32F32;

/// Fixed-point 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Squared euclidean distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Check whether `other` lies within `radius` of this point.
    #[must_use]
    pub fn within_range(self, other: Self, radius: Fixed) -> bool {
        self.distance_squared(other) <= radius * radius
    }
}

/// Serde support for fixed-point numbers.
///
/// Serializes the raw bit representation (i64) to preserve exact
/// precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    #[test]
    fn test_distance_squared() {
        assert_eq!(
            pos(0, 0).distance_squared(pos(3, 4)),
            Fixed::from_num(25)
        );
        assert_eq!(pos(2, 2).distance_squared(pos(2, 2)), Fixed::ZERO);
    }

    #[test]
    fn test_within_range_boundary() {
        let radius = Fixed::from_num(5);
        // Exactly on the radius counts as in range.
        assert!(pos(0, 0).within_range(pos(3, 4), radius));
        assert!(pos(0, 0).within_range(pos(5, 0), radius));
        assert!(!pos(0, 0).within_range(pos(5, 1), radius));
    }

    #[test]
    fn test_serde_roundtrip_is_exact() {
        let v = Vec2Fixed::new(Fixed::from_num(7) / Fixed::from_num(3), Fixed::from_num(-2));
        let encoded = ron::to_string(&v).unwrap();
        let decoded: Vec2Fixed = ron::from_str(&encoded).unwrap();
        assert_eq!(v, decoded);
    }
}
