use anyhow::{Context, Result};
use cellnet_core::{AssociationStrategy, Network, SimConfig};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Association {
    Linear,
    Indexed,
}

impl From<Association> for AssociationStrategy {
    fn from(value: Association) -> Self {
        match value {
            Association::Linear => AssociationStrategy::Linear,
            Association::Indexed => AssociationStrategy::Indexed,
        }
    }
}

/// Simulate users moving through a hexagonal cell grid and the bandwidth each station grants them.
#[derive(Parser, Debug)]
#[command(name = "cellnet", version)]
struct Args {
    /// JSON file with a base configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the grid.
    #[arg(long)]
    cells: Option<usize>,

    #[arg(long)]
    users: Option<usize>,

    /// User speed in units per step.
    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    steps: Option<usize>,

    /// Base station capacity in Mbps.
    #[arg(long)]
    capacity: Option<f64>,

    #[arg(long)]
    spacing: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    association: Option<Association>,

    /// Resolve associations and allocations with rayon (`--parallel true|false`).
    #[arg(long)]
    parallel: Option<bool>,

    /// Write the full history as JSON to this path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full history as JSON on stdout instead of the summary table.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<SimConfig>(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(v) = self.cells {
            config.num_cells = v;
        }
        if let Some(v) = self.users {
            config.num_users = v;
        }
        if let Some(v) = self.speed {
            config.user_speed = v;
        }
        if let Some(v) = self.steps {
            config.sim_steps = v;
        }
        if let Some(v) = self.capacity {
            config.bs_capacity = v;
        }
        if let Some(v) = self.spacing {
            config.cell_spacing = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.association {
            config.association = v.into();
        }
        if let Some(v) = self.parallel {
            config.parallel = v;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    let history = Network::try_new(config)?.run();

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "history written");
    }

    if args.json {
        println!("{}", history.to_json()?);
        return Ok(());
    }

    println!(
        "{:>5} {:>8} {:>9} {:>14} {:>13}",
        "step", "qos_met", "violated", "oversubscribed", "satisfaction"
    );
    for s in history.summaries() {
        println!(
            "{:>5} {:>8} {:>9} {:>14} {:>12.1}%",
            s.step,
            s.qos_met,
            s.qos_violated,
            s.oversubscribed_stations,
            s.mean_satisfaction * 100.0
        );
    }
    Ok(())
}
