use serde::{Deserialize, Serialize};

/// Integer cell address on a routing grid. `x` indexes columns, `y` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance; two points are grid neighbours when this is 1.
    pub fn chebyshev(&self, other: &GridPoint) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}
