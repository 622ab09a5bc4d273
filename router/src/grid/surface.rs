//! World-space routing surface: a [`DenseGrid`] for one layer plus the
//! conversions between cells and wire geometry.

use super::{DenseGrid, RoutingGrid};
use crate::error::RouterError;
use crate::utils::conversion::{GridConverter, rasterize};
use pcb_common::db::indices::NetId;
use pcb_common::geom::{Coordinate, GridPoint, Obstacle, Rect, Segment, Via};
use pcb_common::util::config::MazeRoutingConfig;
use std::collections::HashSet;

/// Anything that can be stamped onto a surface as a static obstacle.
pub trait Blockage {
    /// Cells covered on `surface`'s layer. Empty when on another layer.
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint>;
}

impl Blockage for GridPoint {
    fn blocked_cells(&self, _surface: &RoutingSurface) -> Vec<GridPoint> {
        vec![*self]
    }
}

impl Blockage for [GridPoint] {
    fn blocked_cells(&self, _surface: &RoutingSurface) -> Vec<GridPoint> {
        self.to_vec()
    }
}

impl Blockage for Coordinate {
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint> {
        if self.z != surface.layer {
            return Vec::new();
        }
        vec![surface.to_grid(*self)]
    }
}

impl Blockage for Obstacle {
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint> {
        if self.layer != surface.layer {
            return Vec::new();
        }
        surface.converter.cells_in(self.rect)
    }
}

impl Blockage for Via {
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint> {
        if !self.spans(surface.layer) {
            return Vec::new();
        }
        let c = self.coordinate();
        let r = surface.via_footprint;
        surface.converter.cells_in(Rect {
            min_x: c.x - r,
            min_y: c.y - r,
            max_x: c.x + r,
            max_y: c.y + r,
        })
    }
}

impl Blockage for Segment {
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint> {
        std::slice::from_ref(self).blocked_cells(surface)
    }
}

impl Blockage for [Segment] {
    fn blocked_cells(&self, surface: &RoutingSurface) -> Vec<GridPoint> {
        let on_layer: Vec<Segment> = self
            .iter()
            .filter(|s| s.layer() == surface.layer)
            .copied()
            .collect();
        surface.segments_to_points(&on_layer)
    }
}

/// One routing layer over a rectangular region.
///
/// Searches borrow the grid immutably; every mutation goes through `&mut self`.
pub struct RoutingSurface {
    grid: DenseGrid,
    converter: GridConverter,
    layer: i32,
    path_cost: f64,
    via_footprint: f64,
}

impl RoutingSurface {
    pub fn new(region: Rect, layer: i32, config: &MazeRoutingConfig) -> Result<Self, RouterError> {
        let converter = GridConverter::new(region, config.cell_size)?;
        let grid = DenseGrid::new(converter.grid_width(), converter.grid_height());
        log::debug!(
            "Routing surface on layer {}: {}x{} cells of {:.3}",
            layer,
            converter.grid_width(),
            converter.grid_height(),
            config.cell_size
        );
        Ok(Self {
            grid,
            converter,
            layer,
            path_cost: config.path_cost,
            via_footprint: config.via_footprint,
        })
    }

    pub fn grid(&self) -> &DenseGrid {
        &self.grid
    }
    pub fn converter(&self) -> &GridConverter {
        &self.converter
    }
    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn to_grid(&self, c: Coordinate) -> GridPoint {
        self.converter.to_grid(c)
    }

    pub fn to_world(&self, g: GridPoint) -> Coordinate {
        self.converter.to_world(g, self.layer)
    }

    pub fn add_obstacle<B: Blockage + ?Sized>(&mut self, item: &B) {
        for cell in item.blocked_cells(self) {
            self.grid.set_obstacle(cell);
        }
    }

    pub fn add_path_cost(&mut self, path: &[GridPoint]) {
        for &p in path {
            self.grid.add_cost(p, self.path_cost);
        }
    }

    pub fn remove_path_cost(&mut self, path: &[GridPoint]) {
        for &p in path {
            self.grid.remove_cost(p, self.path_cost);
        }
    }

    pub fn add_history(&mut self, cells: &[GridPoint], increment: f64) {
        for &p in cells {
            self.grid.add_cost(p, increment);
        }
    }

    /// Marks free path cells as wire; endpoints sitting on obstacles stay obstacles.
    pub fn commit_path(&mut self, path: &[GridPoint]) {
        for &p in path {
            self.grid.set_wire(p);
        }
    }

    pub fn rip_up_path(&mut self, path: &[GridPoint]) {
        for &p in path {
            self.grid.clear_wire(p);
        }
    }

    /// One segment per consecutive pair, between cell centres.
    pub fn points_to_segments(&self, points: &[GridPoint], net: NetId) -> Vec<Segment> {
        points
            .windows(2)
            .map(|w| Segment::on_layer(self.to_world(w[0]), self.to_world(w[1]), self.layer, net))
            .collect()
    }

    /// Rasterizes segments back to cells in travel order, without consecutive repeats.
    pub fn segments_to_points(&self, segments: &[Segment]) -> Vec<GridPoint> {
        let mut points: Vec<GridPoint> = Vec::new();
        for seg in segments {
            let a = self.to_grid(seg.start());
            let b = self.to_grid(seg.end());
            for p in rasterize(a, b) {
                if points.last() != Some(&p) {
                    points.push(p);
                }
            }
        }
        points
    }

    pub fn is_overlap_path(&self, a: &[Segment], b: &[Segment]) -> bool {
        is_overlap(&self.segments_to_points(a), &self.segments_to_points(b))
    }

    pub fn is_crossing_path(&self, a: &[Segment], b: &[Segment]) -> bool {
        is_crossing(&self.segments_to_points(a), &self.segments_to_points(b))
    }

    pub fn in_bounds(&self, p: GridPoint) -> bool {
        self.grid.in_bounds(p)
    }
}

/// True when the two paths share a cell.
pub fn is_overlap(a: &[GridPoint], b: &[GridPoint]) -> bool {
    let cells: HashSet<GridPoint> = a.iter().copied().collect();
    b.iter().any(|p| cells.contains(p))
}

/// True when a diagonal step of one path cuts across a diagonal step of the
/// other inside the same 2x2 block.
pub fn is_crossing(a: &[GridPoint], b: &[GridPoint]) -> bool {
    let steps: HashSet<(GridPoint, GridPoint)> = b
        .windows(2)
        .flat_map(|w| [(w[0], w[1]), (w[1], w[0])])
        .collect();
    a.windows(2).any(|w| {
        let dx = w[1].x - w[0].x;
        let dy = w[1].y - w[0].y;
        if dx == 0 || dy == 0 {
            return false;
        }
        steps.contains(&(w[0].offset(dx, 0), w[0].offset(0, dy)))
    })
}
