use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub maze: MazeRoutingConfig,
    #[serde(default)]
    pub flow: FlowRoutingConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MazeRoutingConfig {
    /// Side length of a square routing cell in world units.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_bend_penalty")]
    pub bend_penalty: f64,
    /// Added to every cell of a committed path.
    #[serde(default = "default_path_cost")]
    pub path_cost: f64,
    #[serde(default = "default_history_increment")]
    pub history_increment: f64,
    /// Extra step cost for crossing another net's wire during a relaxed search.
    #[serde(default = "default_wire_penalty")]
    pub wire_penalty: f64,
    /// Fraction of the grid's cells a search may expand before giving up.
    #[serde(default = "default_expansion_ratio")]
    pub expansion_ratio: f64,
    /// Lower bound on the expansion budget for very small grids; off by default.
    #[serde(default = "default_min_expansions")]
    pub min_expansions: usize,
    /// Radius around a via centre that is blocked when a via becomes an obstacle.
    #[serde(default = "default_via_footprint")]
    pub via_footprint: f64,
    /// Margin added around the design extent when sizing the routing surface.
    #[serde(default = "default_region_margin")]
    pub region_margin: f64,
    #[serde(default = "default_maze_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_stagnation_threshold")]
    pub stagnation_threshold: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for MazeRoutingConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            bend_penalty: default_bend_penalty(),
            path_cost: default_path_cost(),
            history_increment: default_history_increment(),
            wire_penalty: default_wire_penalty(),
            expansion_ratio: default_expansion_ratio(),
            min_expansions: default_min_expansions(),
            via_footprint: default_via_footprint(),
            region_margin: default_region_margin(),
            max_iterations: default_maze_max_iterations(),
            stagnation_threshold: default_stagnation_threshold(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlowRoutingConfig {
    /// Number of layer groups a component's tile graph is replicated over.
    #[serde(default = "default_flow_layers")]
    pub layers: usize,
    #[serde(default = "default_wire_cost")]
    pub wire_cost: i64,
    #[serde(default = "default_via_cost")]
    pub via_cost: i64,
    /// Per-layer escape cost, multiplied by the layer index.
    #[serde(default = "default_layer_cost")]
    pub layer_cost: i64,
    #[serde(default = "default_side_capacity")]
    pub side_capacity: i64,
    #[serde(default = "default_via_capacity")]
    pub via_capacity: i64,
    /// Vias one row or column bus can take; each additional via costs two more than the last.
    #[serde(default = "default_max_via_count")]
    pub max_via_count: i64,
    /// Escapes allowed per layer; `None` leaves layers unbounded.
    #[serde(default)]
    pub layer_capacity: Option<i64>,
    /// Bounding-box edges closer than this count as aligned when detecting stacked parts.
    #[serde(default = "default_stack_threshold")]
    pub stack_threshold: f64,
}

impl Default for FlowRoutingConfig {
    fn default() -> Self {
        Self {
            layers: default_flow_layers(),
            wire_cost: default_wire_cost(),
            via_cost: default_via_cost(),
            layer_cost: default_layer_cost(),
            side_capacity: default_side_capacity(),
            via_capacity: default_via_capacity(),
            max_via_count: default_max_via_count(),
            layer_capacity: None,
            stack_threshold: default_stack_threshold(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_case_file")]
    pub case_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    /// Netlist key routed by the maze router.
    #[serde(default)]
    pub netlist: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            case_file: default_case_file(),
            report_file: default_report_file(),
            netlist: 0,
        }
    }
}

fn default_cell_size() -> f64 {
    1.0
}

fn default_bend_penalty() -> f64 {
    10.0
}

fn default_path_cost() -> f64 {
    2.0
}

fn default_history_increment() -> f64 {
    1.0
}

fn default_wire_penalty() -> f64 {
    20.0
}

fn default_expansion_ratio() -> f64 {
    0.5
}

fn default_min_expansions() -> usize {
    0
}

fn default_via_footprint() -> f64 {
    0.0
}

fn default_region_margin() -> f64 {
    2.0
}

fn default_maze_max_iterations() -> usize {
    30
}

fn default_stagnation_threshold() -> usize {
    5
}

fn default_seed() -> u64 {
    0x5eed
}

fn default_flow_layers() -> usize {
    2
}

fn default_wire_cost() -> i64 {
    1
}

fn default_via_cost() -> i64 {
    4
}

fn default_layer_cost() -> i64 {
    2
}

fn default_side_capacity() -> i64 {
    1
}

fn default_via_capacity() -> i64 {
    1
}

fn default_max_via_count() -> i64 {
    4
}

fn default_stack_threshold() -> f64 {
    1.0
}

fn default_case_file() -> String {
    "inputs/case.toml".to_string()
}

fn default_report_file() -> String {
    "output/report.toml".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[maze]
bend_penalty = 3.5

[flow]
layers = 4
layer_capacity = 8
"#,
        )
        .unwrap();
        assert_eq!(config.maze.bend_penalty, 3.5);
        assert_eq!(config.maze.cell_size, 1.0);
        assert_eq!(config.flow.layers, 4);
        assert_eq!(config.flow.layer_capacity, Some(8));
        assert_eq!(config.flow.via_cost, default_via_cost());
        assert_eq!(config.flow.max_via_count, 4);
        assert_eq!(config.maze.min_expansions, 0);
        assert_eq!(config.input.case_file, "inputs/case.toml");
    }
}
