pub mod case;
pub mod component;
pub mod core;
pub mod indices;
pub mod netlist;
