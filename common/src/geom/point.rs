use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Tolerance used when two coordinates are considered the same physical spot.
pub const COORD_TOLERANCE: f64 = 5e-2;

/// World-space position; `z` is the routing layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: i32,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn with_layer(self, z: i32) -> Self {
        Self { z, ..self }
    }

    /// Planar Euclidean distance, ignoring the layer.
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_close_to(&self, other: &Coordinate, tolerance: f64) -> bool {
        self.z == other.z
            && (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y, self.z)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_keeps_left_layer() {
        let a = Coordinate::new(3.0, 4.0, 2);
        let b = Coordinate::new(1.0, 1.0, 0);
        assert_eq!(a - b, Coordinate::new(2.0, 3.0, 2));
        assert_eq!(a + b, Coordinate::new(4.0, 5.0, 2));
        assert!((a.distance(&Coordinate::default()) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn closeness_requires_same_layer() {
        let a = Coordinate::new(1.0, 1.0, 0);
        assert!(a.is_close_to(&Coordinate::new(1.01, 0.99, 0), COORD_TOLERANCE));
        assert!(!a.is_close_to(&Coordinate::new(1.0, 1.0, 1), COORD_TOLERANCE));
    }
}
