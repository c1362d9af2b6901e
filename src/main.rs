use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};

use routecalc::algorithms::{AdvertisementEvent, WorkingTable};
use routecalc::config::{OutputFormat, RunConfig};
use routecalc::network::{load_message_order, load_topology};
use routecalc::{output, DistanceVectorEngine, LinkStateEngine, RoutingObserver, RoutingTable};

#[derive(Parser)]
#[command(name = "routecalc", about = "Compute link-state and distance-vector routing tables")]
struct Cli {
    /// JSON run configuration; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Log every engine step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dijkstra shortest paths from every router
    LinkState {
        #[arg(long)]
        topology: Option<PathBuf>,
    },
    /// Replay distance-vector advertisements in a fixed order
    DistanceVector {
        #[arg(long)]
        topology: Option<PathBuf>,
        #[arg(long)]
        messages: Option<PathBuf>,
    },
}

/// Logs intermediate engine state.
struct LogObserver;

impl RoutingObserver for LogObserver {
    fn on_tables_initialized(&mut self, tables: &[&RoutingTable]) {
        info!("Tables initialized:\n{}", output::render_tables(tables.iter().copied()));
    }

    fn on_advertisement(&mut self, event: &AdvertisementEvent<'_>) {
        info!(
            "[{}] Router {} sending distance vector to {:?}: {}",
            event.sequence + 1,
            event.vector.router,
            event.neighbors,
            event.vector
        );
        info!(
            "Routing tables after the update:\n{}",
            output::render_tables(event.tables.iter().copied())
        );
    }

    fn on_link_state_computed(&mut self, working: &WorkingTable, _table: &RoutingTable) {
        let rows: Vec<String> = working
            .entries
            .iter()
            .map(|e| {
                format!(
                    "destination= {}, cost= {}, predecessor= {}",
                    e.destination,
                    output::cost_label(e.cost),
                    e.predecessor.as_deref().unwrap_or("-")
                )
            })
            .collect();
        info!("Dijkstra table of {}:\n{}", working.source, rows.join("\n"));
    }
}

fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    config.trace_steps |= cli.verbose;

    match &cli.command {
        Command::LinkState { topology } => {
            if let Some(path) = topology {
                config.topology = path.clone();
            }
        }
        Command::DistanceVector { topology, messages } => {
            if let Some(path) = topology {
                config.topology = path.clone();
            }
            if let Some(path) = messages {
                config.messages = path.clone();
            }
        }
    }

    Ok(config)
}

fn emit(config: &RunConfig, algorithm: &str, tables: &[RoutingTable]) -> Result<()> {
    if config.format.wants_text() {
        println!("{}", output::render_tables(tables));
        output::write_tables(&config.output_dir, tables)
            .with_context(|| format!("writing tables to {}", config.output_dir.display()))?;
    }
    if config.format.wants_json() {
        let path = config.json_path();
        output::write_json(&path, algorithm, tables)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .parse_default_env()
        .init();

    let config = resolve_config(&cli)?;
    let topology = load_topology(&config.topology)
        .with_context(|| format!("loading topology {}", config.topology.display()))?;

    match cli.command {
        Command::LinkState { .. } => {
            let engine = LinkStateEngine::new(&topology)?;
            let tables = if config.trace_steps {
                engine.compute_all_observed(&mut LogObserver)?
            } else {
                engine.compute_all()?
            };
            emit(&config, "link-state", &tables)?;
        }
        Command::DistanceVector { .. } => {
            let mut engine = DistanceVectorEngine::new(&topology)?;
            let order = load_message_order(&config.messages, &topology)
                .with_context(|| format!("loading message order {}", config.messages.display()))?;

            if config.trace_steps {
                engine.run_observed(&order, &mut LogObserver)?;
            } else {
                engine.run(&order)?;
            }
            if !engine.is_converged() {
                info!("Advertisement order ended before the tables converged");
            }
            emit(&config, "distance-vector", &engine.into_tables())?;
        }
    }

    info!("Quitting program...");
    Ok(())
}
