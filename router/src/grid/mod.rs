pub mod dense;
pub mod surface;

pub use dense::{Cell, DenseGrid};
pub use surface::{Blockage, RoutingSurface};

use pcb_common::geom::GridPoint;

/// Read-only view searched by the maze router.
pub trait RoutingGrid: Sync + Send {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    #[inline(always)]
    fn in_bounds(&self, p: GridPoint) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width() && p.y < self.height()
    }

    /// Out-of-bounds cells report blocked.
    fn is_blocked(&self, p: GridPoint) -> bool;

    /// Extra cost of entering `p` on top of the step length.
    fn cost(&self, p: GridPoint) -> f64;
}

/// Treats committed wire as passable at a surcharge, so a search can find
/// out which nets stand in the way of a failed connection.
pub struct RelaxedView<'a> {
    grid: &'a DenseGrid,
    wire_penalty: f64,
}

impl<'a> RelaxedView<'a> {
    pub fn new(grid: &'a DenseGrid, wire_penalty: f64) -> Self {
        Self { grid, wire_penalty }
    }
}

impl RoutingGrid for RelaxedView<'_> {
    fn width(&self) -> i32 {
        self.grid.width()
    }
    fn height(&self) -> i32 {
        self.grid.height()
    }

    fn is_blocked(&self, p: GridPoint) -> bool {
        !matches!(self.grid.cell(p), Some(Cell::Free) | Some(Cell::Wire))
    }

    fn cost(&self, p: GridPoint) -> f64 {
        match self.grid.cell(p) {
            Some(Cell::Wire) => self.grid.cost(p) + self.wire_penalty,
            _ => self.grid.cost(p),
        }
    }
}
