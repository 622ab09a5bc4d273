use anyhow::Context;
use clap::{Parser, Subcommand};
use pcb_common::db::case::CaseFile;
use pcb_common::db::core::Design;
use pcb_common::util::config::Config;
use pcb_common::util::logger;
use pcb_router::{RoutingReport, flow_router, maze_router};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `input.case_file` from the configuration.
    #[arg(long, value_name = "FILE")]
    case: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Via and layer assignment for every component.
    Escape,
    /// Maze-route the configured netlist.
    Route,
    /// Escape routing followed by maze routing.
    Flow,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .with_context(|| format!("Failed to read config file {:?}", args.config))?;
        toml::from_str(&config_str).context("Failed to parse config TOML")?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let case_path = args
        .case
        .unwrap_or_else(|| PathBuf::from(&config.input.case_file));
    if !case_path.exists() {
        return Err(anyhow::anyhow!("Case file missing: {:?}", case_path));
    }
    log::info!("Reading case from {:?}", case_path);
    let design = CaseFile::load(&case_path)?.into_design()?;
    log::info!(
        "Design: {} components, {} obstacles, {} netlists",
        design.num_components(),
        design.obstacles.len(),
        design.netlists.len()
    );

    let report = match args.command.unwrap_or(Commands::Flow) {
        Commands::Escape => RoutingReport {
            escape: flow_router::run(&design, &config.flow)?,
            maze: None,
        },
        Commands::Route => RoutingReport {
            escape: Vec::new(),
            maze: Some(run_maze(&design, &config)?),
        },
        Commands::Flow => pcb_router::route(&design, &config)?,
    };

    write_report(&report, &config.input.report_file)
}

fn run_maze(design: &Design, config: &Config) -> anyhow::Result<maze_router::MazeOutcome> {
    let key = config.input.netlist;
    let requests = maze_router::requests_from_design(design, key)
        .with_context(|| format!("Cannot build connections for netlist {}", key))?;
    Ok(maze_router::run(design, &requests, &config.maze)?)
}

fn write_report(report: &RoutingReport, path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent()
        && !parent.exists()
        && !parent.as_os_str().is_empty()
    {
        log::info!("Creating output directory: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }

    let text = toml::to_string(report).context("Failed to serialize routing report")?;
    std::fs::write(path_str, text).with_context(|| format!("Failed to write {}", path_str))?;
    log::info!(
        "Wrote report to {} ({} vias, wirelength {:.3})",
        path_str,
        report.via_count(),
        report.wirelength()
    );
    Ok(())
}
