use pcb_common::error::{DesignError, GeometryError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouterError {
    #[error("invalid escape direction key '{0}', expected \"E\" or \"W\"")]
    InvalidDirectionKey(String),

    #[error("invalid escape angle {0}, expected a multiple of 45 in [0, 360)")]
    InvalidAngle(f64),

    #[error("component '{0}' is stacked both horizontally and vertically")]
    AmbiguousStacking(String),

    #[error("flow graph needs at least one layer")]
    NoLayers,

    #[error("connection of net '{net}' runs from layer {start} to layer {goal}")]
    LayerChange { net: String, start: i32, goal: i32 },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Design(#[from] DesignError),
}
