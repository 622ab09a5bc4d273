use super::vertex::TileRole;
use crate::error::RouterError;
use pcb_common::db::core::Design;
use pcb_common::db::indices::ComponentId;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Tile side through which flow leaves on this edge of the array.
    pub fn role(self) -> TileRole {
        match self {
            Side::North => TileRole::North,
            Side::East => TileRole::East,
            Side::South => TileRole::South,
            Side::West => TileRole::West,
        }
    }
}

/// Sides on which a component's pins may escape.
///
/// Parts sharing a row with another part (bottom and top edges within
/// `threshold`) escape east/west, parts sharing a column escape north/south,
/// and isolated parts use all four sides. Edges are compared after rounding
/// up to whole units.
pub fn escape_sides(
    design: &Design,
    id: ComponentId,
    threshold: f64,
) -> Result<Vec<Side>, RouterError> {
    let this = design.component(id);
    let bl = this.bottom_left();
    let tr = this.top_right();
    let aligned = |a: f64, b: f64| (a.ceil() - b.ceil()).abs() < threshold;

    let mut horizontal = false;
    let mut vertical = false;
    for (i, other) in design.components.iter().enumerate() {
        if i == id.index() {
            continue;
        }
        let obl = other.bottom_left();
        let otr = other.top_right();
        if aligned(obl.x, bl.x) && aligned(otr.x, tr.x) {
            vertical = true;
        }
        if aligned(obl.y, bl.y) && aligned(otr.y, tr.y) {
            horizontal = true;
        }
    }

    match (horizontal, vertical) {
        (true, true) => Err(RouterError::AmbiguousStacking(this.name().to_string())),
        (true, false) => Ok(vec![Side::East, Side::West]),
        (false, true) => Ok(vec![Side::North, Side::South]),
        (false, false) => Ok(Side::ALL.to_vec()),
    }
}
