use crate::db::indices::{NetId, PinId};
use crate::error::{DesignError, GeometryError};
use crate::geom::{Coordinate, Rect};
use std::collections::HashMap;

/// Pins whose cross-axis coordinates differ by no more than this share a row/column.
const ALIGNMENT_TOLERANCE: f64 = 5e-2;

#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub name: String,
    pub coordinate: Coordinate,
    pub net: NetId,
}

impl Pin {
    pub fn new(name: impl Into<String>, coordinate: Coordinate, net: NetId) -> Self {
        Self {
            name: name.into(),
            coordinate,
            net,
        }
    }
}

/// A placed part whose pins sit on a regular array.
///
/// Construction measures the pin pitch in both axes and drops every pin into
/// a `rows x columns` array; the pitch doubles as the tile size used by the
/// flow router.
#[derive(Clone, Debug)]
pub struct Component {
    name: String,
    pins: Vec<Pin>,
    pin_name_map: HashMap<String, PinId>,
    bottom_left: Coordinate,
    top_right: Coordinate,
    tile_width: f64,
    tile_height: f64,
    rows: usize,
    columns: usize,
    pin_arr: Vec<Option<PinId>>,
}

impl Component {
    pub fn new(name: impl Into<String>, pins: Vec<Pin>) -> Result<Self, DesignError> {
        let name = name.into();
        if pins.is_empty() {
            return Err(GeometryError::EmptyComponent { component: name }.into());
        }

        let mut pin_name_map = HashMap::with_capacity(pins.len());
        for (i, pin) in pins.iter().enumerate() {
            if pin_name_map.insert(pin.name.clone(), PinId::new(i)).is_some() {
                return Err(DesignError::DuplicatePin {
                    component: name,
                    pin: pin.name.clone(),
                });
            }
        }

        let (bottom_left, top_right) = extreme_points(&pins);

        let tile_width = min_nonzero_offset(&pins, |c| c.x, |c| c.y).ok_or_else(|| {
            GeometryError::DegenerateTileSpacing {
                component: name.clone(),
                axis: 'x',
            }
        })?;
        let tile_height = min_nonzero_offset(&pins, |c| c.y, |c| c.x).ok_or_else(|| {
            GeometryError::DegenerateTileSpacing {
                component: name.clone(),
                axis: 'y',
            }
        })?;

        let columns = ((top_right.x - bottom_left.x) / tile_width).round() as usize + 1;
        let rows = ((top_right.y - bottom_left.y) / tile_height).round() as usize + 1;

        let mut pin_arr: Vec<Option<PinId>> = vec![None; rows * columns];
        for (i, pin) in pins.iter().enumerate() {
            let col = ((pin.coordinate.x - bottom_left.x) / tile_width).round() as usize;
            let row = ((pin.coordinate.y - bottom_left.y) / tile_height).round() as usize;
            let slot = &mut pin_arr[row * columns + col];
            if let Some(existing) = *slot {
                return Err(GeometryError::PinCollision {
                    component: name,
                    first: pins[existing.index()].name.clone(),
                    second: pin.name.clone(),
                    row,
                    col,
                }
                .into());
            }
            *slot = Some(PinId::new(i));
        }

        log::debug!(
            "Component '{}': {} pins, {}x{} array, tile {:.3}x{:.3}",
            name,
            pins.len(),
            rows,
            columns,
            tile_width,
            tile_height
        );

        Ok(Self {
            name,
            pins,
            pin_name_map,
            bottom_left,
            top_right,
            tile_width,
            tile_height,
            rows,
            columns,
            pin_arr,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.index()]
    }
    pub fn pin_id(&self, name: &str) -> Option<PinId> {
        self.pin_name_map.get(name).copied()
    }
    pub fn bottom_left(&self) -> Coordinate {
        self.bottom_left
    }
    pub fn top_right(&self) -> Coordinate {
        self.top_right
    }
    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }
    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }
    /// Layer the pins were placed on.
    pub fn layer(&self) -> i32 {
        self.bottom_left.z
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_corners(self.bottom_left, self.top_right)
    }

    /// Pin occupying array slot `(row, col)`; out-of-range slots are empty.
    pub fn pin_at(&self, row: i64, col: i64) -> Option<PinId> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.columns {
            return None;
        }
        self.pin_arr[row as usize * self.columns + col as usize]
    }

    /// World position of array slot `(row, col)`; slots outside the array are extrapolated.
    pub fn slot_position(&self, row: i64, col: i64, layer: i32) -> Coordinate {
        Coordinate::new(
            self.bottom_left.x + col as f64 * self.tile_width,
            self.bottom_left.y + row as f64 * self.tile_height,
            layer,
        )
    }
}

fn extreme_points(pins: &[Pin]) -> (Coordinate, Coordinate) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    let mut layer = i32::MAX;
    for pin in pins {
        let c = pin.coordinate;
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
        layer = layer.min(c.z);
    }
    (
        Coordinate::new(min_x, min_y, layer),
        Coordinate::new(max_x, max_y, layer),
    )
}

/// Smallest non-zero spread along `along` between pins aligned on `across`.
fn min_nonzero_offset(
    pins: &[Pin],
    along: impl Fn(&Coordinate) -> f64,
    across: impl Fn(&Coordinate) -> f64,
) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (i, a) in pins.iter().enumerate() {
        for b in &pins[i + 1..] {
            if (across(&a.coordinate) - across(&b.coordinate)).abs() > ALIGNMENT_TOLERANCE {
                continue;
            }
            let offset = (along(&a.coordinate) - along(&b.coordinate)).abs();
            if offset > ALIGNMENT_TOLERANCE {
                best = Some(best.map_or(offset, |m| m.min(offset)));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_pins(rows: usize, cols: usize, pitch_x: f64, pitch_y: f64) -> Vec<Pin> {
        let mut pins = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                pins.push(Pin::new(
                    format!("P{}_{}", r, c),
                    Coordinate::new(10.0 + c as f64 * pitch_x, 20.0 + r as f64 * pitch_y, 0),
                    NetId::new(r * cols + c),
                ));
            }
        }
        pins
    }

    #[test]
    fn derives_tile_grid_from_pitch() {
        let comp = Component::new("U1", grid_pins(3, 4, 1.0, 2.0)).unwrap();
        assert_eq!(comp.rows(), 3);
        assert_eq!(comp.columns(), 4);
        assert!((comp.tile_width() - 1.0).abs() < 1e-12);
        assert!((comp.tile_height() - 2.0).abs() < 1e-12);
        assert_eq!(comp.bottom_left(), Coordinate::new(10.0, 20.0, 0));
        let id = comp.pin_at(2, 1).unwrap();
        assert_eq!(comp.pin(id).name, "P2_1");
        assert_eq!(comp.pin_id("P2_1"), Some(id));
        assert_eq!(comp.pin_at(3, 0), None);
        assert_eq!(comp.pin_at(-1, 0), None);
    }

    #[test]
    fn sparse_array_leaves_empty_cells() {
        let mut pins = grid_pins(3, 3, 1.0, 1.0);
        pins.retain(|p| p.name != "P1_1");
        let comp = Component::new("U2", pins).unwrap();
        assert_eq!(comp.pin_at(1, 1), None);
        assert!(comp.pin_at(0, 0).is_some());
    }

    #[test]
    fn single_row_is_degenerate() {
        let err = Component::new("J1", grid_pins(1, 5, 1.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            DesignError::Geometry(GeometryError::DegenerateTileSpacing {
                component: "J1".into(),
                axis: 'y'
            })
        );
    }

    #[test]
    fn duplicate_pin_names_are_rejected() {
        let mut pins = grid_pins(2, 2, 1.0, 1.0);
        pins[1].name = pins[0].name.clone();
        assert!(matches!(
            Component::new("U3", pins),
            Err(DesignError::DuplicatePin { .. })
        ));
    }
}
