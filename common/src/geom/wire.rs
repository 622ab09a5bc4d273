use super::point::Coordinate;
use crate::db::indices::NetId;
use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Below this magnitude an axis delta counts as zero when classifying slope.
const SLOPE_EPSILON: f64 = 1e-9;

/// Directed wire on a single layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    start: Coordinate,
    end: Coordinate,
    net: NetId,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate, net: NetId) -> Result<Self, GeometryError> {
        if start.z != end.z {
            return Err(GeometryError::MixedLayerSegment {
                start_layer: start.z,
                end_layer: end.z,
            });
        }
        Ok(Self { start, end, net })
    }

    /// Segment with both endpoints moved onto `layer`.
    pub fn on_layer(start: Coordinate, end: Coordinate, layer: i32, net: NetId) -> Self {
        Self {
            start: start.with_layer(layer),
            end: end.with_layer(layer),
            net,
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }
    pub fn end(&self) -> Coordinate {
        self.end
    }
    pub fn net(&self) -> NetId {
        self.net
    }
    pub fn layer(&self) -> i32 {
        self.start.z
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Δy/Δx. Vertical and zero-length segments report `+inf`, horizontal ones `0`.
    pub fn slope(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        if dx.abs() < SLOPE_EPSILON {
            f64::INFINITY
        } else if dy.abs() < SLOPE_EPSILON {
            0.0
        } else {
            dy / dx
        }
    }
}

/// Layer transition at a point. `coordinate.z` is always the lower layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Via {
    coordinate: Coordinate,
    layer: i32,
    net: Option<NetId>,
}

impl Via {
    pub fn new(coordinate: Coordinate, layer: i32, net: Option<NetId>) -> Result<Self, GeometryError> {
        if coordinate.z == layer {
            return Err(GeometryError::SingleLayerVia { layer });
        }
        let (low, high) = if coordinate.z < layer {
            (coordinate.z, layer)
        } else {
            (layer, coordinate.z)
        };
        Ok(Self {
            coordinate: coordinate.with_layer(low),
            layer: high,
            net,
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
    /// Upper layer of the span.
    pub fn layer(&self) -> i32 {
        self.layer
    }
    pub fn net(&self) -> Option<NetId> {
        self.net
    }

    pub fn spans(&self, layer: i32) -> bool {
        self.coordinate.z <= layer && layer <= self.layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(
            Coordinate::new(x0, y0, 0),
            Coordinate::new(x1, y1, 0),
            NetId::new(0),
        )
        .unwrap()
    }

    #[test]
    fn slope_horizontal_and_vertical() {
        assert_eq!(seg(0.0, 0.0, 10.0, 0.0).slope(), 0.0);
        assert_eq!(seg(0.0, 0.0, 0.0, 10.0).slope(), f64::INFINITY);
        assert_eq!(seg(0.0, 0.0, 0.0, -3.0).slope(), f64::INFINITY);
    }

    #[test]
    fn slope_diagonal_is_scale_invariant() {
        for scale in [1e-3, 0.5, 1.0, 10.0, 1e4] {
            assert!((seg(0.0, 0.0, scale, scale).slope() - 1.0).abs() < 1e-12);
            assert!((seg(0.0, 0.0, scale, -scale).slope() + 1.0).abs() < 1e-12);
            assert!((seg(scale, 0.0, 0.0, scale).slope() + 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mixed_layer_segment_is_rejected() {
        let err = Segment::new(
            Coordinate::new(0.0, 0.0, 0),
            Coordinate::new(1.0, 0.0, 1),
            NetId::new(3),
        );
        assert_eq!(
            err,
            Err(GeometryError::MixedLayerSegment {
                start_layer: 0,
                end_layer: 1
            })
        );
    }

    #[test]
    fn via_orders_its_layers() {
        let via = Via::new(Coordinate::new(2.0, 2.0, 3), 1, None).unwrap();
        assert_eq!(via.coordinate().z, 1);
        assert_eq!(via.layer(), 3);
        assert!(via.spans(2));
        assert!(!via.spans(0));
        assert!(Via::new(Coordinate::new(0.0, 0.0, 1), 1, None).is_err());
    }
}
