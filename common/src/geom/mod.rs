pub mod coord;
pub mod point;
pub mod rect;
pub mod rtree;
pub mod wire;

pub use coord::GridPoint;
pub use point::Coordinate;
pub use rect::{Obstacle, Rect};
pub use wire::{Segment, Via};
