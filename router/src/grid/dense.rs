use super::RoutingGrid;
use pcb_common::geom::GridPoint;

/// Occupancy of one routing cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Free,
    /// Static blockage; never cleared by rip-up.
    Obstacle,
    /// Committed wiring.
    Wire,
}

/// Row-major occupancy array with a parallel accumulated-cost array.
#[derive(Clone)]
pub struct DenseGrid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    costs: Vec<f64>,
}

impl DenseGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let size = (width as usize) * (height as usize);

        if size > 200_000_000 {
            log::warn!(
                "Allocating large DenseGrid: {} cells. Ensure sufficient RAM.",
                size
            );
        }

        Self {
            width,
            height,
            cells: vec![Cell::Free; size],
            costs: vec![0.0; size],
        }
    }

    #[inline(always)]
    fn index(&self, p: GridPoint) -> Option<usize> {
        if self.in_bounds(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, p: GridPoint) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    pub fn set_obstacle(&mut self, p: GridPoint) {
        if let Some(i) = self.index(p) {
            self.cells[i] = Cell::Obstacle;
        }
    }

    /// Marks a free cell as wire. Returns whether the cell changed.
    pub fn set_wire(&mut self, p: GridPoint) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i] == Cell::Free => {
                self.cells[i] = Cell::Wire;
                true
            }
            _ => false,
        }
    }

    /// Frees a wire cell; obstacles are left alone.
    pub fn clear_wire(&mut self, p: GridPoint) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i] == Cell::Wire => {
                self.cells[i] = Cell::Free;
                true
            }
            _ => false,
        }
    }

    pub fn add_cost(&mut self, p: GridPoint, amount: f64) {
        if let Some(i) = self.index(p) {
            self.costs[i] += amount;
        }
    }

    /// Subtracts `amount`, never going below zero.
    pub fn remove_cost(&mut self, p: GridPoint, amount: f64) {
        if let Some(i) = self.index(p) {
            self.costs[i] = (self.costs[i] - amount).max(0.0);
        }
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }
}

impl RoutingGrid for DenseGrid {
    fn width(&self) -> i32 {
        self.width
    }
    fn height(&self) -> i32 {
        self.height
    }

    fn is_blocked(&self, p: GridPoint) -> bool {
        !matches!(self.cell(p), Some(Cell::Free))
    }

    #[inline(always)]
    fn cost(&self, p: GridPoint) -> f64 {
        self.index(p).map_or(0.0, |i| self.costs[i])
    }
}
