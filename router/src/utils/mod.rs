pub mod conversion;

pub use conversion::{GridConverter, rasterize};
