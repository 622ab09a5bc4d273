use super::escape::{Side, escape_sides};
use super::vertex::{Axis, Port, TileRole, Vertex, VertexKind};
use crate::algo::mcmf::{EdgeRef, FlowNetwork, FlowResult};
use crate::error::RouterError;
use pcb_common::db::component::Component;
use pcb_common::db::core::Design;
use pcb_common::db::indices::{ComponentId, PinId};
use pcb_common::geom::Coordinate;
use pcb_common::util::config::FlowRoutingConfig;
use std::collections::HashMap;

/// Network nodes per tile: an entry and an exit for each of the five roles.
const TILE_BLOCK: usize = 10;

/// Where one layer group's vertices live inside the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSpan {
    pub layer: i32,
    pub pin_start_idx: usize,
    pub tile_start_idx: usize,
    pub exit_idx: usize,
    /// First via bus of the group; buses only exist above the base group.
    pub bus_start_idx: usize,
}

/// Via-capable centre pair joined across two adjacent layer groups.
#[derive(Clone, Copy, Debug)]
pub struct ViaLink {
    pub row: usize,
    pub col: usize,
    pub lower: usize,
    pub upper: usize,
    pub up: EdgeRef,
    pub down: EdgeRef,
}

/// A pin row or column on an upper layer that collects escapes arriving
/// there through vias and carries them out of the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViaBus {
    pub axis: Axis,
    pub index: usize,
    pub layer: i32,
    pub vertex: usize,
}

/// Escape-routing flow graph for a single component.
///
/// Pins sit on the corners of a tile lattice one ring larger than the pin
/// array. Flow runs source -> pin -> tile sides -> neighbouring tiles ->
/// boundary side on an escape edge -> per-layer exit -> sink. Every tile node
/// is an entry/exit pair joined by a unit edge, so no two nets share a spot.
/// Via-capable centres connect the same tile across layer groups; above the
/// base group they also feed a row or column bus, where every extra via on
/// the same bus costs more than the last.
pub struct TileGraph {
    component: ComponentId,
    rows: usize,
    cols: usize,
    vertices: Vec<Vertex>,
    network: FlowNetwork,
    source: usize,
    sink: usize,
    spans: Vec<LayerSpan>,
    pin_edges: Vec<(PinId, EdgeRef)>,
    via_links: Vec<ViaLink>,
    buses: Vec<ViaBus>,
    sides: Vec<Side>,
    row_buses: bool,
    column_buses: bool,
}

impl TileGraph {
    pub fn build(
        design: &Design,
        id: ComponentId,
        config: &FlowRoutingConfig,
    ) -> Result<Self, RouterError> {
        if config.layers == 0 {
            return Err(RouterError::NoLayers);
        }
        let comp = design.component(id);
        let sides = escape_sides(design, id, config.stack_threshold)?;
        let rows = comp.rows();
        let cols = comp.columns();

        let row_buses = sides.iter().any(|s| matches!(s, Side::East | Side::West));
        let column_buses = sides.iter().any(|s| matches!(s, Side::North | Side::South));

        let mut graph = Self {
            component: id,
            rows,
            cols,
            vertices: Vec::new(),
            network: FlowNetwork::default(),
            source: 0,
            sink: 1,
            spans: Vec::with_capacity(config.layers),
            pin_edges: Vec::new(),
            via_links: Vec::new(),
            buses: Vec::new(),
            sides,
            row_buses,
            column_buses,
        };
        graph.push_vertex(VertexKind::Source, comp.bottom_left());
        graph.push_vertex(VertexKind::Sink, comp.top_right());

        for k in 0..config.layers {
            let layer = comp.layer() + k as i32;
            graph.add_layer_vertices(comp, layer, k > 0);
        }
        graph.add_edges(comp, config);

        log::debug!(
            "Tile graph for '{}': {} vertices, {} edges, {} pins, {} via buses, sides {:?}",
            comp.name(),
            graph.vertices.len(),
            graph.network.num_edges(),
            graph.pin_edges.len(),
            graph.buses.len(),
            graph.sides
        );
        Ok(graph)
    }

    fn push_vertex(&mut self, kind: VertexKind, coordinate: Coordinate) -> usize {
        self.vertices.push(Vertex::new(kind, coordinate));
        self.network.add_node()
    }

    // Corners go column by column, bottom to top, so that every lattice
    // corner shared by neighbouring tiles is emitted exactly once.
    fn add_layer_vertices(&mut self, comp: &Component, layer: i32, with_buses: bool) {
        let pin_start_idx = self.vertices.len();
        for j in -1..=self.cols as i64 {
            for i in -1..=self.rows as i64 {
                let position = comp.slot_position(i, j, layer);
                let kind = match comp.pin_at(i, j) {
                    Some(pin) if comp.pin(pin).coordinate.z == layer => VertexKind::Pin {
                        name: comp.pin(pin).name.clone(),
                        pin,
                    },
                    _ => VertexKind::Corner,
                };
                self.push_vertex(kind, position);
            }
        }

        // Sides sit a quarter tile in from the centre so that the facing
        // sides of two neighbours stay distinct spots.
        let tile_start_idx = self.vertices.len();
        let (w, h) = (comp.tile_width(), comp.tile_height());
        for col in 0..=self.cols {
            for row in 0..=self.rows {
                let center = tile_center(comp, row, col, layer);
                let via_capable = comp.pin_at(row as i64, col as i64 - 1).is_some();
                let center_role = if via_capable {
                    TileRole::Via
                } else {
                    TileRole::Center
                };
                let nodes = [
                    (TileRole::North, 0.0, h / 4.0),
                    (TileRole::East, w / 4.0, 0.0),
                    (TileRole::South, 0.0, -h / 4.0),
                    (TileRole::West, -w / 4.0, 0.0),
                    (center_role, 0.0, 0.0),
                ];
                for (role, dx, dy) in nodes {
                    let at = Coordinate::new(center.x + dx, center.y + dy, layer);
                    for port in [Port::Entry, Port::Exit] {
                        self.push_vertex(
                            VertexKind::Tile {
                                role,
                                row,
                                col,
                                port,
                            },
                            at,
                        );
                    }
                }
            }
        }

        let exit_idx = self.push_vertex(VertexKind::LayerExit, comp.top_right().with_layer(layer));

        let bus_start_idx = self.vertices.len();
        if with_buses {
            if self.row_buses {
                for index in 0..self.rows {
                    let at = tile_center(comp, index, self.cols, layer);
                    self.push_bus(Axis::Row, index, at);
                }
            }
            if self.column_buses {
                for index in 0..self.cols {
                    let at = tile_center(comp, self.rows, index + 1, layer);
                    self.push_bus(Axis::Column, index, at);
                }
            }
        }

        self.spans.push(LayerSpan {
            layer,
            pin_start_idx,
            tile_start_idx,
            exit_idx,
            bus_start_idx,
        });
    }

    fn push_bus(&mut self, axis: Axis, index: usize, at: Coordinate) {
        let vertex = self.push_vertex(VertexKind::Bus { axis, index }, at);
        self.buses.push(ViaBus {
            axis,
            index,
            layer: at.z,
            vertex,
        });
    }

    fn add_edges(&mut self, comp: &Component, config: &FlowRoutingConfig) {
        let rows = self.rows as i64;
        let cols = self.cols as i64;
        let tile_ok = |a: i64, b: i64| a >= 0 && b >= 0 && a <= rows && b <= cols;
        let sides = self.sides.clone();
        let roles = [
            TileRole::North,
            TileRole::East,
            TileRole::South,
            TileRole::West,
            TileRole::Center,
        ];

        for k in 0..self.spans.len() {
            for b in 0..=cols {
                for a in 0..=rows {
                    let (row, col) = (a as usize, b as usize);
                    for role in roles {
                        let entry = self.tile_entry(k, row, col, role);
                        self.network.add_edge(entry, entry + 1, 1, 0);
                    }

                    let center_in = self.tile_entry(k, row, col, TileRole::Center);
                    let center_out = self.tile_exit(k, row, col, TileRole::Center);
                    for role in TileRole::CARDINALS {
                        let side_in = self.tile_entry(k, row, col, role);
                        let side_out = self.tile_exit(k, row, col, role);
                        self.network
                            .add_edge(side_out, center_in, config.side_capacity, 0);
                        self.network
                            .add_edge(center_out, side_in, config.side_capacity, 0);

                        let (dr, dc) = role.step();
                        if tile_ok(a + dr, b + dc) {
                            let facing = self.tile_entry(
                                k,
                                (a + dr) as usize,
                                (b + dc) as usize,
                                role.opposite(),
                            );
                            self.network.add_edge(side_out, facing, 1, config.wire_cost);
                        }
                    }

                    for &side in &sides {
                        let on_boundary = match side {
                            Side::North => a == rows,
                            Side::South => a == 0,
                            Side::East => b == cols,
                            Side::West => b == 0,
                        };
                        if on_boundary {
                            let from = self.tile_exit(k, row, col, side.role());
                            let exit = self.spans[k].exit_idx;
                            self.network
                                .add_edge(from, exit, 1, k as i64 * config.layer_cost);
                        }
                    }

                    if self.vertices[center_in].tile_role() != Some(TileRole::Via) {
                        continue;
                    }
                    if k + 1 < self.spans.len() {
                        let upper = self.tile_entry(k + 1, row, col, TileRole::Center);
                        let up = self.network.add_edge(
                            center_out,
                            upper,
                            config.via_capacity,
                            config.via_cost,
                        );
                        let down = self.network.add_edge(
                            upper + 1,
                            center_in,
                            config.via_capacity,
                            config.via_cost,
                        );
                        self.via_links.push(ViaLink {
                            row,
                            col,
                            lower: center_in,
                            upper,
                            up,
                            down,
                        });
                    }
                    if k > 0 {
                        // the pin at the tile's top-left corner names the bus
                        let cost = k as i64 * config.layer_cost;
                        for bus in [self.row_bus(k, row), self.column_bus(k, col - 1)]
                            .into_iter()
                            .flatten()
                        {
                            self.network.add_edge(center_out, bus, 1, cost);
                        }
                    }
                }
            }
        }

        for (i, pin) in comp.pins().iter().enumerate() {
            let Some(k) = self.spans.iter().position(|s| s.layer == pin.coordinate.z) else {
                log::warn!(
                    "Pin '{}' of '{}' is on layer {} outside the routed layer groups",
                    pin.name,
                    comp.name(),
                    pin.coordinate.z
                );
                continue;
            };
            let (row, col) = pin_slot(comp, PinId::new(i));
            let vertex = self.corner_index(k, row, col);
            let edge = self.network.add_edge(self.source, vertex, 1, 0);
            self.pin_edges.push((PinId::new(i), edge));

            // a pin feeds the side it touches in each of up to four tiles
            let feeds = [
                (row, col, TileRole::East),
                (row, col + 1, TileRole::North),
                (row + 1, col + 1, TileRole::West),
                (row + 1, col, TileRole::South),
            ];
            for (a, b, role) in feeds {
                if tile_ok(a, b) {
                    let side = self.tile_entry(k, a as usize, b as usize, role);
                    self.network.add_edge(vertex, side, 1, 0);
                }
            }
        }

        let demand = self.pin_edges.len() as i64;
        for k in 0..self.spans.len() {
            let cap = config.layer_capacity.unwrap_or(demand);
            self.network.add_edge(self.spans[k].exit_idx, self.sink, cap, 0);
        }
        // successive vias on one bus cost 1, 3, 5, ...
        for bus in self.buses.clone() {
            for n in 0..config.max_via_count {
                self.network.add_edge(bus.vertex, self.sink, 1, 2 * n + 1);
            }
        }
    }

    /// Vertex of lattice corner `(i, j)`, `i` in `-1..=rows`, `j` in `-1..=cols`.
    pub fn corner_index(&self, k: usize, i: i64, j: i64) -> usize {
        let height = self.rows + 2;
        self.spans[k].pin_start_idx + (j + 1) as usize * height + (i + 1) as usize
    }

    /// Entry node of `role` in tile `(row, col)` on layer group `k`.
    pub fn tile_entry(&self, k: usize, row: usize, col: usize, role: TileRole) -> usize {
        let tile = col * (self.rows + 1) + row;
        self.spans[k].tile_start_idx + tile * TILE_BLOCK + 2 * role.slot() + Port::Entry.offset()
    }

    /// Exit node of `role` in tile `(row, col)` on layer group `k`.
    pub fn tile_exit(&self, k: usize, row: usize, col: usize, role: TileRole) -> usize {
        self.tile_entry(k, row, col, role) - Port::Entry.offset() + Port::Exit.offset()
    }

    /// Bus of pin row `row` on layer group `k`, when rows carry buses there.
    pub fn row_bus(&self, k: usize, row: usize) -> Option<usize> {
        (k > 0 && self.row_buses && row < self.rows).then(|| self.spans[k].bus_start_idx + row)
    }

    /// Bus of pin column `col` on layer group `k`, when columns carry buses there.
    pub fn column_bus(&self, k: usize, col: usize) -> Option<usize> {
        let rows_before = if self.row_buses { self.rows } else { 0 };
        (k > 0 && self.column_buses && col < self.cols)
            .then(|| self.spans[k].bus_start_idx + rows_before + col)
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
    pub fn vertex(&self, v: usize) -> &Vertex {
        &self.vertices[v]
    }
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }
    pub fn source(&self) -> usize {
        self.source
    }
    pub fn sink(&self) -> usize {
        self.sink
    }
    pub fn spans(&self) -> &[LayerSpan] {
        &self.spans
    }
    pub fn via_links(&self) -> &[ViaLink] {
        &self.via_links
    }
    pub fn buses(&self) -> &[ViaBus] {
        &self.buses
    }
    pub fn escape_sides(&self) -> &[Side] {
        &self.sides
    }

    /// Number of pins that must reach the sink.
    pub fn demand(&self) -> i64 {
        self.pin_edges.len() as i64
    }

    pub fn solve(&mut self) -> FlowResult {
        self.network.min_cost_max_flow(self.source, self.sink)
    }

    /// Splits the solved flow into one source-to-sink vertex walk per routed
    /// pin. Zero-cost loops picked up on the way are cut out.
    pub fn pin_paths(&self) -> Vec<(PinId, Vec<usize>)> {
        let mut remaining: Vec<Vec<i64>> = (0..self.network.num_nodes())
            .map(|v| {
                self.network
                    .edges_from(v)
                    .iter()
                    .map(|e| if e.cap > 0 { e.flow.max(0) } else { 0 })
                    .collect()
            })
            .collect();

        let mut paths = Vec::new();
        for &(pin, edge) in &self.pin_edges {
            if remaining[edge.from][edge.index] <= 0 {
                continue;
            }
            remaining[edge.from][edge.index] -= 1;
            let start = self.network.edge(edge).to;

            let mut path = vec![self.source, start];
            let mut position: HashMap<usize, usize> = HashMap::from([(self.source, 0), (start, 1)]);
            let mut v = start;
            while v != self.sink {
                let Some(i) = remaining[v].iter().position(|&f| f > 0) else {
                    break;
                };
                remaining[v][i] -= 1;
                let next = self.network.edges_from(v)[i].to;
                if let Some(&p) = position.get(&next) {
                    for dropped in path.drain(p + 1..) {
                        position.remove(&dropped);
                    }
                } else {
                    position.insert(next, path.len());
                    path.push(next);
                }
                v = next;
            }

            if v == self.sink {
                paths.push((pin, path));
            } else {
                log::warn!("Flow for pin {:?} stops at vertex {}", pin, v);
            }
        }
        paths
    }
}

fn tile_center(comp: &Component, row: usize, col: usize, layer: i32) -> Coordinate {
    Coordinate::new(
        comp.bottom_left().x + (col as f64 - 0.5) * comp.tile_width(),
        comp.bottom_left().y + (row as f64 - 0.5) * comp.tile_height(),
        layer,
    )
}

fn pin_slot(comp: &Component, pin: PinId) -> (i64, i64) {
    let c = comp.pin(pin).coordinate;
    let col = ((c.x - comp.bottom_left().x) / comp.tile_width()).round() as i64;
    let row = ((c.y - comp.bottom_left().y) / comp.tile_height()).round() as i64;
    (row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_common::db::component::Pin;

    fn design_with(rows: usize, cols: usize) -> (Design, ComponentId) {
        let mut design = Design::new();
        let mut pins = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let net = design.net_id(&format!("N{}_{}", r, c));
                pins.push(Pin::new(
                    format!("{}{}", r, c),
                    Coordinate::new(c as f64 * 2.0, r as f64 * 2.0, 0),
                    net,
                ));
            }
        }
        let id = design.add_component("U1", pins).unwrap();
        (design, id)
    }

    #[test]
    fn vertex_layout_and_spans() {
        let (design, id) = design_with(2, 3);
        let config = FlowRoutingConfig::default();
        let graph = TileGraph::build(&design, id, &config).unwrap();

        let corners = (2 + 2) * (3 + 2);
        let tiles = (2 + 1) * (3 + 1) * TILE_BLOCK;
        // an isolated part gets a bus per pin row and per pin column above the base
        let buses = 2 + 3;
        assert_eq!(
            graph.vertices().len(),
            2 + config.layers * (corners + tiles + 1) + buses
        );
        assert_eq!(graph.spans().len(), 2);
        let span = graph.spans()[1];
        assert_eq!(span.layer, 1);
        assert_eq!(span.tile_start_idx - span.pin_start_idx, corners);
        assert_eq!(span.exit_idx - span.tile_start_idx, tiles);
        assert_eq!(span.bus_start_idx, span.exit_idx + 1);
        assert_eq!(graph.spans()[0].bus_start_idx, graph.spans()[1].pin_start_idx);
        assert_eq!(graph.buses().len(), buses);

        // pin corners carry names on the pin layer only
        let v = graph.vertex(graph.corner_index(0, 1, 2));
        assert!(matches!(&v.kind, VertexKind::Pin { name, .. } if name == "12"));
        assert_eq!(v.coordinate, Coordinate::new(4.0, 2.0, 0));
        assert_eq!(graph.vertex(graph.corner_index(1, 1, 2)).kind, VertexKind::Corner);
        assert_eq!(graph.vertex(graph.corner_index(0, -1, -1)).kind, VertexKind::Corner);
        assert_eq!(graph.demand(), 6);
    }

    #[test]
    fn tile_geometry_and_via_roles() {
        let (design, id) = design_with(2, 2);
        let graph = TileGraph::build(&design, id, &FlowRoutingConfig::default()).unwrap();

        let entry = graph.tile_entry(0, 1, 1, TileRole::Center);
        let exit = graph.tile_exit(0, 1, 1, TileRole::Center);
        assert_eq!(exit, entry + 1);
        let center = graph.vertex(entry);
        assert_eq!(center.coordinate, Coordinate::new(1.0, 1.0, 0));
        assert_eq!(graph.vertex(exit).coordinate, center.coordinate);
        assert!(matches!(
            graph.vertex(exit).kind,
            VertexKind::Tile {
                port: Port::Exit,
                ..
            }
        ));
        // top-left corner of tile (1, 1) is pin slot (1, 0)
        assert_eq!(center.tile_role(), Some(TileRole::Via));
        let east = graph.vertex(graph.tile_entry(0, 1, 1, TileRole::East));
        assert_eq!(east.coordinate, Coordinate::new(1.5, 1.0, 0));
        let facing = graph.vertex(graph.tile_entry(0, 1, 2, TileRole::West));
        assert_eq!(facing.coordinate, Coordinate::new(2.5, 1.0, 0));
        let corner_tile = graph.vertex(graph.tile_entry(0, 0, 0, TileRole::Center));
        assert_eq!(corner_tile.tile_role(), Some(TileRole::Center));

        // one via link per via-capable tile between the two layer groups
        assert_eq!(graph.via_links().len(), 4);
        let link = graph.via_links()[0];
        assert_eq!(graph.vertex(link.upper).layer(), 1);
    }

    #[test]
    fn every_tile_node_passes_one_unit() {
        let (design, id) = design_with(3, 3);
        let graph = TileGraph::build(&design, id, &FlowRoutingConfig::default()).unwrap();
        for k in 0..graph.spans().len() {
            for col in 0..=3 {
                for row in 0..=3 {
                    for role in TileRole::CARDINALS.into_iter().chain([TileRole::Center]) {
                        let entry = graph.tile_entry(k, row, col, role);
                        let out: Vec<_> = graph
                            .network()
                            .edges_from(entry)
                            .iter()
                            .filter(|e| e.cap > 0)
                            .collect();
                        assert_eq!(out.len(), 1);
                        assert_eq!(out[0].to, entry + 1);
                        assert_eq!(out[0].cap, 1);
                    }
                }
            }
        }
    }

    #[test]
    fn only_pin_corners_carry_edges() {
        let (design, id) = design_with(3, 3);
        let graph = TileGraph::build(&design, id, &FlowRoutingConfig::default()).unwrap();
        let mut pins = 0;
        for (v, vertex) in graph.vertices().iter().enumerate() {
            match vertex.kind {
                VertexKind::Corner => assert!(graph.network().edges_from(v).is_empty()),
                VertexKind::Pin { .. } => {
                    pins += 1;
                    let feeds = graph
                        .network()
                        .edges_from(v)
                        .iter()
                        .filter(|e| e.cap > 0)
                        .count();
                    assert_eq!(feeds, 4);
                }
                _ => {}
            }
        }
        assert_eq!(pins, 9);
    }

    #[test]
    fn stacked_parts_get_row_buses_with_rising_cost() {
        let (mut design, _) = design_with(2, 2);
        let mut pins = Vec::new();
        for r in 0..2 {
            for c in 0..2 {
                let net = design.net_id(&format!("M{}_{}", r, c));
                pins.push(Pin::new(
                    format!("{}{}", r, c),
                    Coordinate::new(20.0 + c as f64 * 2.0, r as f64 * 2.0, 0),
                    net,
                ));
            }
        }
        design.add_component("U2", pins).unwrap();

        let config = FlowRoutingConfig {
            layers: 3,
            max_via_count: 3,
            ..FlowRoutingConfig::default()
        };
        let graph = TileGraph::build(&design, ComponentId::new(0), &config).unwrap();
        assert_eq!(graph.escape_sides(), &[Side::East, Side::West]);
        // two pin rows on each of the two upper layers, no column buses
        assert_eq!(graph.buses().len(), 4);
        assert!(graph.buses().iter().all(|b| b.axis == Axis::Row));
        assert_eq!(graph.column_bus(1, 0), None);
        assert_eq!(graph.row_bus(0, 0), None);

        let bus = graph.row_bus(2, 1).unwrap();
        assert_eq!(graph.vertex(bus).layer(), 2);
        let mut costs: Vec<i64> = graph
            .network()
            .edges_from(bus)
            .iter()
            .filter(|e| e.to == graph.sink() && e.cap > 0)
            .map(|e| e.cost)
            .collect();
        costs.sort_unstable();
        assert_eq!(costs, vec![1, 3, 5]);

        // only the via-capable centres of that row on the bus's layer reach it
        let center_out = graph.tile_exit(2, 1, 1, TileRole::Center);
        let feed = graph
            .network()
            .edges_from(center_out)
            .iter()
            .find(|e| e.to == bus)
            .unwrap();
        assert_eq!(feed.cost, 2 * config.layer_cost);
        let feeders = graph
            .vertices()
            .iter()
            .enumerate()
            .filter(|(v, _)| graph.network().edges_from(*v).iter().any(|e| e.to == bus && e.cap > 0))
            .count();
        assert_eq!(feeders, 2);
    }

    #[test]
    fn single_layer_has_no_vias() {
        let (design, id) = design_with(3, 3);
        let config = FlowRoutingConfig {
            layers: 1,
            ..FlowRoutingConfig::default()
        };
        let graph = TileGraph::build(&design, id, &config).unwrap();
        assert!(graph.via_links().is_empty());
        assert!(graph.buses().is_empty());
        let zero = FlowRoutingConfig {
            layers: 0,
            ..FlowRoutingConfig::default()
        };
        assert_eq!(
            TileGraph::build(&design, id, &zero).err(),
            Some(RouterError::NoLayers)
        );
    }

    #[test]
    fn solved_flow_decomposes_per_pin() {
        let (design, id) = design_with(3, 3);
        let mut graph = TileGraph::build(&design, id, &FlowRoutingConfig::default()).unwrap();
        let result = graph.solve();
        assert_eq!(result.flow, graph.demand());

        let paths = graph.pin_paths();
        assert_eq!(paths.len() as i64, result.flow);
        for (_, path) in &paths {
            assert_eq!(path.first(), Some(&graph.source()));
            assert_eq!(path.last(), Some(&graph.sink()));
            let mut seen = std::collections::HashSet::new();
            assert!(path.iter().all(|v| seen.insert(*v)));
        }
        for v in 0..graph.network().num_nodes() {
            if v != graph.source() && v != graph.sink() {
                assert_eq!(graph.network().excess(v), 0);
            }
        }
    }
}
