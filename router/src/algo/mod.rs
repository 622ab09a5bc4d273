pub mod astar;
pub mod mcmf;
pub mod union_find;

pub use astar::{AStar, Direction, Route, SearchParams};
pub use mcmf::{FlowNetwork, FlowResult};
pub use union_find::{UnionFind, WeightedEdge, kruskal_mst};
