use pcb_common::db::indices::PinId;
use pcb_common::geom::Coordinate;

/// Position of a node inside a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileRole {
    North,
    East,
    South,
    West,
    Center,
    /// A centre that may carry a via to the neighbouring layer group.
    Via,
}

impl TileRole {
    pub const CARDINALS: [TileRole; 4] = [
        TileRole::North,
        TileRole::East,
        TileRole::South,
        TileRole::West,
    ];

    /// Position of the role among a tile's five nodes.
    pub fn slot(self) -> usize {
        match self {
            TileRole::North => 0,
            TileRole::East => 1,
            TileRole::South => 2,
            TileRole::West => 3,
            TileRole::Center | TileRole::Via => 4,
        }
    }

    pub fn is_center(self) -> bool {
        matches!(self, TileRole::Center | TileRole::Via)
    }

    /// The side of the adjacent tile that faces this one.
    pub fn opposite(self) -> TileRole {
        match self {
            TileRole::North => TileRole::South,
            TileRole::South => TileRole::North,
            TileRole::East => TileRole::West,
            TileRole::West => TileRole::East,
            other => other,
        }
    }

    /// Row/column step towards the neighbour behind this side.
    pub fn step(self) -> (i64, i64) {
        match self {
            TileRole::North => (1, 0),
            TileRole::South => (-1, 0),
            TileRole::East => (0, 1),
            TileRole::West => (0, -1),
            TileRole::Center | TileRole::Via => (0, 0),
        }
    }
}

/// Tile nodes are split in two so that at most one unit of flow, and hence
/// one net, passes through any of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    Entry,
    Exit,
}

impl Port {
    pub fn offset(self) -> usize {
        match self {
            Port::Entry => 0,
            Port::Exit => 1,
        }
    }
}

/// Direction a via bus runs on its layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VertexKind {
    Source,
    Sink,
    /// Collects escapes leaving the component on one layer.
    LayerExit,
    /// Lattice corner without a pin.
    Corner,
    Pin {
        name: String,
        pin: PinId,
    },
    Tile {
        role: TileRole,
        row: usize,
        col: usize,
        port: Port,
    },
    /// Carries escapes along one pin row or column of an upper layer.
    Bus {
        axis: Axis,
        index: usize,
    },
}

/// Flow graph node. `coordinate.z` is the physical layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub kind: VertexKind,
    pub coordinate: Coordinate,
}

impl Vertex {
    pub fn new(kind: VertexKind, coordinate: Coordinate) -> Self {
        Self { kind, coordinate }
    }

    pub fn layer(&self) -> i32 {
        self.coordinate.z
    }

    /// Whether the vertex stands for a physical spot that wiring can touch.
    pub fn is_geometric(&self) -> bool {
        matches!(
            self.kind,
            VertexKind::Corner | VertexKind::Pin { .. } | VertexKind::Tile { .. }
        )
    }

    pub fn tile_role(&self) -> Option<TileRole> {
        match self.kind {
            VertexKind::Tile { role, .. } => Some(role),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_pair_up_across_tiles() {
        for role in TileRole::CARDINALS {
            assert_eq!(role.opposite().opposite(), role);
            let (dr, dc) = role.step();
            let (or, oc) = role.opposite().step();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
        assert_eq!(TileRole::Via.slot(), TileRole::Center.slot());
        assert!(TileRole::Via.is_center());
        assert_eq!(Port::Exit.offset() - Port::Entry.offset(), 1);
    }

    #[test]
    fn buses_are_not_geometric() {
        let bus = Vertex::new(
            VertexKind::Bus {
                axis: Axis::Row,
                index: 2,
            },
            Coordinate::new(3.0, 1.5, 1),
        );
        assert!(!bus.is_geometric());
        assert_eq!(bus.layer(), 1);
        assert_eq!(bus.tile_role(), None);
    }
}
