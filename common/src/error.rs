use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("segment spans two layers: start on layer {start_layer}, end on layer {end_layer}")]
    MixedLayerSegment { start_layer: i32, end_layer: i32 },

    #[error("via on layer {layer} must connect two different layers")]
    SingleLayerVia { layer: i32 },

    #[error("component '{component}' has no non-zero pin spacing along {axis}")]
    DegenerateTileSpacing { component: String, axis: char },

    #[error("component '{component}' has no pins")]
    EmptyComponent { component: String },

    #[error("pins '{first}' and '{second}' of component '{component}' fall into tile cell ({row}, {col})")]
    PinCollision {
        component: String,
        first: String,
        second: String,
        row: usize,
        col: usize,
    },

    #[error("obstacle corners lie on different layers ({0} and {1})")]
    MixedLayerObstacle(i32, i32),

    #[error("grid cell width must be positive, got {0}")]
    InvalidCellWidth(f64),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DesignError {
    #[error("netlist with key {0} already exists")]
    DuplicateNetlist(i32),

    #[error("component '{0}' already exists")]
    DuplicateComponent(String),

    #[error("component '{component}' already has a pin named '{pin}'")]
    DuplicatePin { component: String, pin: String },

    #[error("net '{net}' already exists in netlist {netlist}")]
    DuplicateNet { netlist: i32, net: String },

    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("component '{component}' has no pin named '{pin}'")]
    UnknownPin { component: String, pin: String },

    #[error("unknown netlist key {0}")]
    UnknownNetlist(i32),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
