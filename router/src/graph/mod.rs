pub mod escape;
pub mod tile_graph;
pub mod vertex;

pub use escape::{Side, escape_sides};
pub use tile_graph::{LayerSpan, TileGraph, ViaBus, ViaLink};
pub use vertex::{Axis, Port, TileRole, Vertex, VertexKind};
