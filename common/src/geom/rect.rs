use super::point::Coordinate;
use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Builds a rectangle from any two opposite corners.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Inclusive-bound intersection test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains(&self, p: Coordinate) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Forbidden routing area on one layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub layer: i32,
}

impl Obstacle {
    pub fn new(bottom_left: Coordinate, top_right: Coordinate) -> Result<Self, GeometryError> {
        if bottom_left.z != top_right.z {
            return Err(GeometryError::MixedLayerObstacle(bottom_left.z, top_right.z));
        }
        Ok(Self {
            rect: Rect::from_corners(bottom_left, top_right),
            layer: bottom_left.z,
        })
    }

    pub fn bottom_left(&self) -> Coordinate {
        Coordinate::new(self.rect.min_x, self.rect.min_y, self.layer)
    }

    pub fn top_right(&self) -> Coordinate {
        Coordinate::new(self.rect.max_x, self.rect.max_y, self.layer)
    }
}
