use pcb_common::db::case::CaseFile;
use pcb_common::db::core::Design;
use pcb_common::db::indices::NetId;
use pcb_common::geom::{Coordinate, GridPoint, Obstacle, Rect};
use pcb_common::util::config::{Config, MazeRoutingConfig};
use pcb_router::algo::{AStar, SearchParams};
use pcb_router::grid::{DenseGrid, RoutingSurface};
use pcb_router::maze_router::{self, ConnectionRequest, StopReason};
use std::f64::consts::SQRT_2;

fn p(x: i32, y: i32) -> GridPoint {
    GridPoint::new(x, y)
}

#[test]
fn diagonal_across_open_grid() {
    let grid = DenseGrid::new(5, 5);
    let route = AStar::new()
        .find_path(&grid, p(0, 0), p(4, 4), None, &SearchParams::default())
        .unwrap();
    assert_eq!(route.points, (0..5).map(|i| p(i, i)).collect::<Vec<_>>());
    assert!((route.cost - 4.0 * SQRT_2).abs() < 1e-9);
    assert_eq!(route.bends, 0);
}

#[test]
fn blocked_centre_forces_detour() {
    let mut grid = DenseGrid::new(5, 5);
    grid.set_obstacle(p(2, 2));
    let route = AStar::new()
        .find_path(&grid, p(0, 0), p(4, 4), None, &SearchParams::default())
        .unwrap();
    assert!(!route.points.contains(&p(2, 2)));
    assert!(route.cost > 4.0 * SQRT_2);
    assert_eq!(route.points.first(), Some(&p(0, 0)));
    assert_eq!(route.points.last(), Some(&p(4, 4)));
}

#[test]
fn exhausted_budget_gives_up() {
    let grid = DenseGrid::new(5, 5);
    let params = SearchParams {
        expansion_ratio: 0.0,
        min_expansions: 1,
        ..SearchParams::default()
    };
    let mut solver = AStar::new();
    assert!(solver.find_path(&grid, p(0, 0), p(4, 4), None, &params).is_none());
    assert_eq!(solver.expansions(), 2);
}

#[test]
fn found_path_survives_segment_round_trip() {
    let region = Rect::from_corners(
        Coordinate::new(0.0, 0.0, 0),
        Coordinate::new(10.0, 10.0, 0),
    );
    let surface = RoutingSurface::new(region, 0, &MazeRoutingConfig::default()).unwrap();
    let route = AStar::new()
        .find_path(surface.grid(), p(1, 1), p(8, 4), None, &SearchParams::default())
        .unwrap();
    let segments = surface.points_to_segments(&route.points, NetId::new(0));
    assert_eq!(segments.len(), route.points.len() - 1);
    assert!(segments.iter().all(|s| s.layer() == 0));
    assert_eq!(surface.segments_to_points(&segments), route.points);
}

#[test]
fn contested_corridor_is_resolved_by_rip_up() {
    // Three lanes between x = 3 and x = 7; only the middle one reaches the
    // short connection, which the long connection takes first.
    let mut design = Design::new();
    for y in [1.0, 3.0] {
        design.add_obstacle(
            Obstacle::new(Coordinate::new(3.0, y, 0), Coordinate::new(7.9, y + 0.9, 0)).unwrap(),
        );
    }
    // Anchors the surface at the origin without blocking layer 0.
    design.add_obstacle(
        Obstacle::new(Coordinate::new(0.0, 0.0, 1), Coordinate::new(10.0, 4.0, 1)).unwrap(),
    );

    let requests = vec![
        ConnectionRequest::new(
            NetId::new(0),
            "LONG",
            Coordinate::new(1.5, 2.5, 0),
            Coordinate::new(9.5, 2.5, 0),
        ),
        ConnectionRequest::new(
            NetId::new(1),
            "SHORT",
            Coordinate::new(3.5, 2.5, 0),
            Coordinate::new(7.5, 2.5, 0),
        ),
    ];
    let config = MazeRoutingConfig {
        region_margin: 0.0,
        ..MazeRoutingConfig::default()
    };

    let outcome = maze_router::run(&design, &requests, &config).unwrap();
    assert_eq!(outcome.stop, StopReason::Converged);
    assert_eq!(outcome.iterations, 2);
    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.routes.len(), 2);

    let long = &outcome.routes[0];
    let short = &outcome.routes[1];
    assert_eq!(short.net_name, "SHORT");
    assert_eq!(short.points, (3..=7).map(|x| p(x, 2)).collect::<Vec<_>>());
    assert!(long.points.iter().all(|q| !(3..=7).contains(&q.x) || q.y != 2));
    assert!(long.bends >= 2);
}

const CASE: &str = r#"
[[layers]]
index = 0
name = "TOP"

[[layers]]
index = 1
name = "BOTTOM"

[[components]]
name = "U1"
pins = [
    { name = "A1", x = 0.0, y = 0.0, net = "D0" },
    { name = "A2", x = 1.0, y = 0.0, net = "D1" },
    { name = "B1", x = 0.0, y = 1.0, net = "D2" },
    { name = "B2", x = 1.0, y = 1.0, net = "D3" },
]

[[components]]
name = "U2"
pins = [
    { name = "A1", x = 10.0, y = 0.0, net = "D0" },
    { name = "A2", x = 11.0, y = 0.0, net = "D1" },
    { name = "B1", x = 10.0, y = 1.0, net = "D2" },
    { name = "B2", x = 11.0, y = 1.0, net = "D3" },
]

[[obstacles]]
x0 = 4.0
y0 = 0.0
x1 = 5.0
y1 = 1.0

[[netlists]]
key = 0
nets = ["D0", "D2"]
"#;

#[test]
fn case_file_routes_end_to_end() {
    let case: CaseFile = toml::from_str(CASE).unwrap();
    let design = case.into_design().unwrap();
    let report = pcb_router::route(&design, &Config::default()).unwrap();

    assert_eq!(report.escape.len(), 2);
    for plan in &report.escape {
        assert!(plan.is_complete(), "{} escaped {} pins", plan.component, plan.flow);
        assert_eq!(plan.escapes.len(), 4);
    }

    let maze = report.maze.as_ref().unwrap();
    assert_eq!(maze.stop, StopReason::Converged);
    assert_eq!(maze.routes.len(), 2);
    for route in &maze.routes {
        assert!(route.segments.iter().all(|s| s.layer() == 0));
        let first = route.segments.first().unwrap().start();
        let last = route.segments.last().unwrap().end();
        assert!(first.x < 2.0 && last.x > 9.0);
    }
    assert!(report.wirelength() > 20.0);

    let text = toml::to_string(&report).unwrap();
    assert!(text.contains("state = \"complete\""));
    assert!(text.contains("stop = \"Converged\""));
}

#[test]
fn missing_netlist_skips_maze_routing() {
    let case: CaseFile = toml::from_str(CASE).unwrap();
    let design = case.into_design().unwrap();
    let mut config = Config::default();
    config.input.netlist = 7;
    let report = pcb_router::route(&design, &config).unwrap();
    assert!(report.maze.is_none());
    assert_eq!(report.escape.len(), 2);
}
