use crate::algo::astar::{AStar, Direction, Route, SearchParams};
use crate::algo::union_find::{kruskal_mst, point_edges};
use crate::error::RouterError;
use crate::grid::surface::{is_crossing, is_overlap};
use crate::grid::{Cell, RelaxedView, RoutingSurface};
use pcb_common::db::core::Design;
use pcb_common::db::indices::NetId;
use pcb_common::geom::{Coordinate, GridPoint, Rect, Segment};
use pcb_common::util::config::MazeRoutingConfig;
use pcb_common::util::profiler::StageTimer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Two-pin connection to be routed on the maze surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRequest {
    pub net: NetId,
    pub net_name: String,
    pub start: Coordinate,
    pub goal: Coordinate,
    /// Heading the wire already has when it leaves `start`.
    pub incoming: Option<Direction>,
}

impl ConnectionRequest {
    pub fn new(net: NetId, net_name: impl Into<String>, start: Coordinate, goal: Coordinate) -> Self {
        Self {
            net,
            net_name: net_name.into(),
            start,
            goal,
            incoming: None,
        }
    }

    /// Constrains the first step to continue a pin escape on `side` at `angle` degrees.
    pub fn with_escape(mut self, side: &str, angle: f64) -> Result<Self, RouterError> {
        self.incoming = Some(Direction::from_escape(side, angle)?);
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    Converged,
    IterationLimit,
    Stagnated,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoutedConnection {
    pub net: NetId,
    pub net_name: String,
    pub cost: f64,
    pub bends: usize,
    pub points: Vec<GridPoint>,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MazeOutcome {
    pub stop: StopReason,
    pub iterations: usize,
    pub routes: Vec<RoutedConnection>,
    /// Indices into the request list that never found a path.
    pub failed: Vec<usize>,
}

impl MazeOutcome {
    pub fn wirelength(&self) -> f64 {
        self.routes
            .iter()
            .flat_map(|r| r.segments.iter())
            .map(Segment::length)
            .sum()
    }
}

/// Splits every net of netlist `key` into two-pin connections along a
/// minimum spanning tree over its pin positions.
pub fn requests_from_design(design: &Design, key: i32) -> Result<Vec<ConnectionRequest>, RouterError> {
    let netlist = design.netlist(key)?;
    let mut requests = Vec::new();
    for net in netlist.nets() {
        if net.pins.len() < 2 {
            log::debug!("Net '{}' has {} pin(s), nothing to route", net.name, net.pins.len());
            continue;
        }
        let coords: Vec<Coordinate> = net.pins.iter().map(|&p| design.pin_coordinate(p)).collect();
        for edge in kruskal_mst(&point_edges(&coords)) {
            requests.push(ConnectionRequest::new(
                net.id,
                net.name.clone(),
                coords[edge.a],
                coords[edge.b],
            ));
        }
    }
    log::info!(
        "Netlist {}: {} nets decomposed into {} connections",
        key,
        netlist.len(),
        requests.len()
    );
    Ok(requests)
}

impl StopReason {
    /// Combines the outcomes of two layers; any layer that did not converge wins.
    fn and(self, other: StopReason) -> StopReason {
        if self == StopReason::Converged {
            other
        } else {
            self
        }
    }
}

/// Routes `requests` with rip-up and reroute, one surface per layer.
///
/// Connections are grouped by layer and each group is routed independently.
/// Every pass routes the pending connections in order and commits each path.
/// Connections that fail are searched again on a view where wire is passable;
/// nets in the way are ripped up, the contested cells get history cost, and
/// the failed connections go first in the next pass, followed by the ripped
/// ones in shuffled order.
pub fn run(
    design: &Design,
    requests: &[ConnectionRequest],
    config: &MazeRoutingConfig,
) -> Result<MazeOutcome, RouterError> {
    let _timer = StageTimer::new("Maze routing");

    let mut by_layer: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, r) in requests.iter().enumerate() {
        if r.start.z != r.goal.z {
            return Err(RouterError::LayerChange {
                net: r.net_name.clone(),
                start: r.start.z,
                goal: r.goal.z,
            });
        }
        by_layer.entry(r.start.z).or_default().push(i);
    }

    let mut outcome = MazeOutcome {
        stop: StopReason::Converged,
        iterations: 0,
        routes: Vec::new(),
        failed: Vec::new(),
    };
    let mut routes = Vec::new();
    for (layer, indices) in by_layer {
        let part = route_layer(design, requests, &indices, layer, config)?;
        outcome.stop = outcome.stop.and(part.stop);
        outcome.iterations = outcome.iterations.max(part.iterations);
        outcome.failed.extend(part.failed);
        routes.extend(part.routes);
    }

    routes.sort_by_key(|(i, _)| *i);
    outcome.routes = routes.into_iter().map(|(_, r)| r).collect();
    outcome.failed.sort_unstable();
    Ok(outcome)
}

struct LayerOutcome {
    stop: StopReason,
    iterations: usize,
    routes: Vec<(usize, RoutedConnection)>,
    failed: Vec<usize>,
}

/// Rip-up and reroute for the connections `indices` of `requests`, all on `layer`.
fn route_layer(
    design: &Design,
    requests: &[ConnectionRequest],
    indices: &[usize],
    layer: i32,
    config: &MazeRoutingConfig,
) -> Result<LayerOutcome, RouterError> {
    let group: Vec<&ConnectionRequest> = indices.iter().map(|&i| &requests[i]).collect();
    let Some(region) = routing_region(design, &group, config.region_margin, config.cell_size)
    else {
        return Ok(LayerOutcome {
            stop: StopReason::Converged,
            iterations: 0,
            routes: Vec::new(),
            failed: Vec::new(),
        });
    };

    let mut surface = RoutingSurface::new(region, layer, config)?;
    for obstacle in design.obstacles_in(region, layer) {
        surface.add_obstacle(obstacle);
    }
    for comp in &design.components {
        for pin in comp.pins() {
            surface.add_obstacle(&pin.coordinate);
        }
    }
    log::info!(
        "Maze routing {} connections on layer {} ({}x{} cells, {} blocked)",
        group.len(),
        layer,
        surface.converter().grid_width(),
        surface.converter().grid_height(),
        surface.grid().count(Cell::Obstacle)
    );

    let params = SearchParams::from(config);
    let endpoints: Vec<(GridPoint, GridPoint)> = group
        .iter()
        .map(|r| (surface.to_grid(r.start), surface.to_grid(r.goal)))
        .collect();

    let mut routed: Vec<Option<Route>> = vec![None; group.len()];
    let mut order: Vec<usize> = (0..group.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut solver = AStar::new();
    let mut best_failures = usize::MAX;
    let mut stale = 0;
    let mut iterations = 0;
    let mut stop = StopReason::IterationLimit;
    let mut failed: Vec<usize> = Vec::new();

    while iterations < config.max_iterations {
        iterations += 1;
        failed.clear();

        for &i in &order {
            if routed[i].is_some() {
                continue;
            }
            let (start, goal) = endpoints[i];
            match solver.find_path(surface.grid(), start, goal, group[i].incoming, &params) {
                Some(route) => {
                    surface.commit_path(&route.points);
                    surface.add_path_cost(&route.points);
                    routed[i] = Some(route);
                }
                None => failed.push(i),
            }
        }

        log::info!(
            "Layer {} iteration {}: {} routed, {} failed",
            layer,
            iterations,
            group.len() - failed.len(),
            failed.len()
        );

        if failed.is_empty() {
            stop = StopReason::Converged;
            break;
        }
        if failed.len() < best_failures {
            best_failures = failed.len();
            stale = 0;
        } else {
            stale += 1;
            if stale >= config.stagnation_threshold {
                stop = StopReason::Stagnated;
                break;
            }
        }
        if iterations == config.max_iterations {
            break;
        }

        let relaxed = RelaxedView::new(surface.grid(), config.wire_penalty);
        let relaxed_routes: Vec<(usize, Option<Route>)> = failed
            .par_iter()
            .map_with(AStar::new(), |solver, &i| {
                let (start, goal) = endpoints[i];
                (i, solver.find_path(&relaxed, start, goal, group[i].incoming, &params))
            })
            .collect();

        let mut victims = BTreeSet::new();
        let mut contested = Vec::new();
        for (i, found) in relaxed_routes {
            let Some(route) = found else {
                log::debug!("Connection {} is blocked by obstacles alone", indices[i]);
                continue;
            };
            let inner = interior(&route.points);
            for (j, existing) in routed.iter().enumerate() {
                if let Some(a) = existing
                    && (is_overlap(inner, &a.points)
                        || is_crossing(&route.points, &a.points))
                {
                    victims.insert(j);
                }
            }
            contested.extend(
                inner
                    .iter()
                    .filter(|&&p| surface.grid().cell(p) == Some(Cell::Wire))
                    .copied(),
            );
        }

        for &j in &victims {
            if let Some(a) = routed[j].take() {
                surface.rip_up_path(&a.points);
                surface.remove_path_cost(&a.points);
            }
        }
        surface.add_history(&contested, config.history_increment);

        let mut ripped: Vec<usize> = victims.into_iter().collect();
        ripped.shuffle(&mut rng);
        log::debug!(
            "Ripped up {} connections, {} contested cells",
            ripped.len(),
            contested.len()
        );
        order = failed.iter().copied().chain(ripped).collect();
    }

    if stop != StopReason::Converged {
        log::warn!(
            "Maze routing on layer {} stopped ({:?}) after {} iterations with {} unrouted connections",
            layer,
            stop,
            iterations,
            failed.len()
        );
    }

    let routes = routed
        .into_iter()
        .enumerate()
        .filter_map(|(i, a)| a.map(|a| (i, a)))
        .map(|(i, a)| {
            let request = group[i];
            let connection = RoutedConnection {
                net: request.net,
                net_name: request.net_name.clone(),
                cost: a.cost,
                bends: a.bends,
                segments: surface.points_to_segments(&a.points, request.net),
                points: a.points,
            };
            (indices[i], connection)
        })
        .collect();

    Ok(LayerOutcome {
        stop,
        iterations,
        routes,
        failed: failed.iter().map(|&i| indices[i]).collect(),
    })
}

fn interior(points: &[GridPoint]) -> &[GridPoint] {
    if points.len() > 2 {
        &points[1..points.len() - 1]
    } else {
        &[]
    }
}

/// Design and endpoint extent plus `margin`, grown by one cell at the top and
/// right so points on the far edge still land inside the grid.
fn routing_region(
    design: &Design,
    requests: &[&ConnectionRequest],
    margin: f64,
    cell: f64,
) -> Option<Rect> {
    let ends = requests
        .iter()
        .flat_map(|r| [Rect::from_corners(r.start, r.start), Rect::from_corners(r.goal, r.goal)]);
    design
        .extent()
        .into_iter()
        .chain(ends)
        .reduce(|a, b| a.union(&b))
        .map(|r| {
            let r = r.expand(margin);
            Rect {
                max_x: r.max_x + cell,
                max_y: r.max_y + cell,
                ..r
            }
        })
}
