use pcb_common::error::GeometryError;
use pcb_common::geom::{Coordinate, GridPoint, Rect};

/// Maps world coordinates onto square routing cells anchored at a bottom-left origin.
#[derive(Clone, Copy, Debug)]
pub struct GridConverter {
    origin_x: f64,
    origin_y: f64,
    cell_width: f64,
    grid_w: i32,
    grid_h: i32,
}

impl GridConverter {
    /// Covers `region` with cells of side `cell_width`; partial cells at the top/right count.
    pub fn new(region: Rect, cell_width: f64) -> Result<Self, GeometryError> {
        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(GeometryError::InvalidCellWidth(cell_width));
        }
        let grid_w = ((region.width() / cell_width).ceil() as i32).max(1);
        let grid_h = ((region.height() / cell_width).ceil() as i32).max(1);
        Ok(Self {
            origin_x: region.min_x,
            origin_y: region.min_y,
            cell_width,
            grid_w,
            grid_h,
        })
    }

    pub fn grid_width(&self) -> i32 {
        self.grid_w
    }
    pub fn grid_height(&self) -> i32 {
        self.grid_h
    }
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Cell containing `c`. Not clamped: points off the region map outside the grid.
    pub fn to_grid(&self, c: Coordinate) -> GridPoint {
        GridPoint::new(
            ((c.x - self.origin_x) / self.cell_width).floor() as i32,
            ((c.y - self.origin_y) / self.cell_width).floor() as i32,
        )
    }

    /// Centre of cell `g`.
    pub fn to_world(&self, g: GridPoint, layer: i32) -> Coordinate {
        Coordinate::new(
            self.origin_x + (g.x as f64 + 0.5) * self.cell_width,
            self.origin_y + (g.y as f64 + 0.5) * self.cell_width,
            layer,
        )
    }

    /// Every in-range cell touched by `rect`, bounds inclusive.
    pub fn cells_in(&self, rect: Rect) -> Vec<GridPoint> {
        let lo = self.to_grid(Coordinate::new(rect.min_x, rect.min_y, 0));
        let hi = self.to_grid(Coordinate::new(rect.max_x, rect.max_y, 0));
        let (x0, x1) = (lo.x.max(0), hi.x.min(self.grid_w - 1));
        let (y0, y1) = (lo.y.max(0), hi.y.min(self.grid_h - 1));
        let mut cells = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                cells.push(GridPoint::new(x, y));
            }
        }
        cells
    }
}

/// Cells from `a` to `b` inclusive, in travel order. Exact for straight and 45° runs.
pub fn rasterize(a: GridPoint, b: GridPoint) -> Vec<GridPoint> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return vec![a];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            GridPoint::new(
                a.x + (t * dx as f64).round() as i32,
                a.y + (t * dy as f64).round() as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(w: f64, h: f64) -> Rect {
        Rect::from_corners(Coordinate::new(-2.0, 3.0, 0), Coordinate::new(-2.0 + w, 3.0 + h, 0))
    }

    #[test]
    fn cell_counts_round_up() {
        let conv = GridConverter::new(region(10.0, 4.5), 1.0).unwrap();
        assert_eq!((conv.grid_width(), conv.grid_height()), (10, 5));
        let conv = GridConverter::new(region(0.0, 0.0), 0.5).unwrap();
        assert_eq!((conv.grid_width(), conv.grid_height()), (1, 1));
        assert!(GridConverter::new(region(1.0, 1.0), 0.0).is_err());
        assert!(GridConverter::new(region(1.0, 1.0), f64::NAN).is_err());
    }

    #[test]
    fn world_grid_round_trip_through_centres() {
        let conv = GridConverter::new(region(8.0, 8.0), 0.25).unwrap();
        for g in [GridPoint::new(0, 0), GridPoint::new(5, 17), GridPoint::new(31, 31)] {
            let c = conv.to_world(g, 1);
            assert_eq!(c.z, 1);
            assert_eq!(conv.to_grid(c), g);
        }
        assert_eq!(conv.to_grid(Coordinate::new(-2.0, 3.0, 0)), GridPoint::new(0, 0));
        assert_eq!(conv.to_grid(Coordinate::new(-2.1, 3.0, 0)), GridPoint::new(-1, 0));
    }

    #[test]
    fn rect_cells_are_clamped() {
        let conv = GridConverter::new(region(4.0, 4.0), 1.0).unwrap();
        let cells = conv.cells_in(Rect::from_corners(
            Coordinate::new(-5.0, 3.5, 0),
            Coordinate::new(-0.5, 4.5, 0),
        ));
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&GridPoint::new(0, 0)));
        assert!(cells.contains(&GridPoint::new(1, 1)));
    }

    #[test]
    fn rasterize_lines() {
        let a = GridPoint::new(1, 1);
        assert_eq!(rasterize(a, a), vec![a]);
        assert_eq!(
            rasterize(a, GridPoint::new(1, -2)),
            vec![a, GridPoint::new(1, 0), GridPoint::new(1, -1), GridPoint::new(1, -2)]
        );
        assert_eq!(
            rasterize(a, GridPoint::new(-1, 3)),
            vec![a, GridPoint::new(0, 2), GridPoint::new(-1, 3)]
        );
        let sloped = rasterize(GridPoint::new(0, 0), GridPoint::new(4, 2));
        assert_eq!(sloped.len(), 5);
        assert_eq!(sloped.last(), Some(&GridPoint::new(4, 2)));
        assert!(sloped.windows(2).all(|w| w[0].chebyshev(&w[1]) == 1));
    }
}
