//! Geotag CLI
//!
//! Offline driver for the geotagging engine: projects pixel annotations,
//! recomputes target consensus and re-clusters ROI batches from JSON files.

mod commands;
mod documents;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use geotag_core::{classify_direction, CameraGimbalMode, GeotagConfig, PolicyKind};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use documents::{print_json, read_json, ProjectionRequest, RoiEntry, TargetDocument};

#[derive(Parser, Debug)]
#[command(name = "geotag")]
#[command(about = "Ground-station geotagging engine")]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project pixel annotations to ground locations
    Project {
        /// JSON array of projection requests
        file: PathBuf,
    },

    /// Recompute the consensus geotag of one target
    Consensus {
        /// JSON document with the target's sightings
        file: PathBuf,

        /// Overrides the configured policy
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,
    },

    /// Re-cluster a batch of ROIs
    Cluster {
        /// JSON array of ROIs or bare points
        file: PathBuf,

        /// Neighbourhood radius in degrees
        #[arg(short, long)]
        eps: Option<f64>,

        /// Gimbal mode; only tracking re-clusters
        #[arg(short, long, value_enum)]
        mode: Option<GimbalArg>,
    },

    /// Classify a bearing in radians into a compass direction
    Direction {
        #[arg(allow_negative_numbers = true)]
        radians: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Weighted,
    Median,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Weighted => PolicyKind::WeightedAverage,
            PolicyArg::Median => PolicyKind::Median,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GimbalArg {
    Idle,
    Fixed,
    Tracking,
}

impl From<GimbalArg> for CameraGimbalMode {
    fn from(arg: GimbalArg) -> Self {
        match arg {
            GimbalArg::Idle => CameraGimbalMode::Idle,
            GimbalArg::Fixed => CameraGimbalMode::Fixed,
            GimbalArg::Tracking => CameraGimbalMode::Tracking,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GeotagConfig> {
    match path {
        Some(path) => {
            let config = GeotagConfig::load(path)?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(GeotagConfig::default()),
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    debug!("Config: {:?}", config);

    match args.command {
        Command::Project { file } => {
            let requests: Vec<ProjectionRequest> = read_json(&file)?;
            print_json(&commands::run_project(&requests, &config))
        }
        Command::Consensus { file, policy } => {
            let document: TargetDocument = read_json(&file)?;
            let policy = config.consensus.policy(policy.map(Into::into))?;
            info!("Consensus policy: {}", policy.name());
            print_json(&commands::run_consensus(&document, &policy))
        }
        Command::Cluster { file, eps, mode } => {
            let entries: Vec<RoiEntry> = read_json(&file)?;
            let mut clustering = config.clustering.clone();
            if let Some(eps) = eps {
                clustering.epsilon = eps;
                clustering.validate().context("Invalid --eps")?;
            }
            print_json(&commands::run_cluster(entries, &clustering, mode.map(Into::into)))
        }
        Command::Direction { radians } => {
            let direction = classify_direction(radians);
            print_json(&serde_json::json!({
                "direction": direction,
                "name": direction.name(),
            }))
        }
    }
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the JSON result
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
