pub mod algo;
pub mod error;
pub mod flow_router;
pub mod graph;
pub mod grid;
pub mod maze_router;
pub mod utils;

use error::RouterError;
use flow_router::EscapePlan;
use maze_router::MazeOutcome;
use pcb_common::db::core::Design;
use pcb_common::util::config::Config;
use serde::Serialize;

/// Everything the routers produced for one design.
#[derive(Debug, Default, Serialize)]
pub struct RoutingReport {
    pub escape: Vec<EscapePlan>,
    pub maze: Option<MazeOutcome>,
}

impl RoutingReport {
    pub fn via_count(&self) -> usize {
        self.escape.iter().map(|p| p.vias.len()).sum()
    }

    pub fn wirelength(&self) -> f64 {
        let escape: f64 = self
            .escape
            .iter()
            .flat_map(|p| p.segments.iter())
            .map(|s| s.length())
            .sum();
        escape + self.maze.as_ref().map_or(0.0, MazeOutcome::wirelength)
    }
}

/// Escape-routes every component, then maze-routes the configured netlist
/// when the design has it.
pub fn route(design: &Design, config: &Config) -> Result<RoutingReport, RouterError> {
    let escape = flow_router::run(design, &config.flow)?;

    let key = config.input.netlist;
    let maze = if design.netlists.contains_key(&key) {
        let requests = maze_router::requests_from_design(design, key)?;
        Some(maze_router::run(design, &requests, &config.maze)?)
    } else {
        log::warn!("Netlist {} not found, skipping maze routing", key);
        None
    };

    let report = RoutingReport { escape, maze };
    log::info!(
        "Routing finished: {} vias, total wirelength {:.3}",
        report.via_count(),
        report.wirelength()
    );
    Ok(report)
}
