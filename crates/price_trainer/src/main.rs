//! Flight price trainer CLI
//!
//! Fits the linear price model on a CSV export and writes the model, route
//! vocabulary and model hash to the artifact directory.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flight_price_core::{FsArtifactStore, PriceConfig, RouteOrdering};
use flight_price_trainer::{train_and_save, FlightDataset, TrainingParams};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Ordering {
    FirstSeen,
    Lexicographic,
}

impl From<Ordering> for RouteOrdering {
    fn from(value: Ordering) -> Self {
        match value {
            Ordering::FirstSeen => RouteOrdering::FirstSeen,
            Ordering::Lexicographic => RouteOrdering::Lexicographic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "flight-price-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic trainer for the flight price model", long_about = None)]
struct Args {
    /// Input CSV dataset path (defaults to training.dataset_path)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for model artifacts (defaults to artifacts.directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the train/test split
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    test_size: Option<f64>,

    /// Route code assignment order
    #[arg(long, value_enum)]
    route_ordering: Option<Ordering>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PriceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PriceConfig::default(),
    };
    config.load_from_env().context("Invalid environment override")?;

    if let Some(input) = args.input {
        config.training.dataset_path = input;
    }
    if let Some(output) = args.output {
        config.artifacts.directory = output;
    }
    if let Some(seed) = args.seed {
        config.training.seed = seed;
    }
    if let Some(test_size) = args.test_size {
        config.training.test_size = test_size;
    }
    if let Some(ordering) = args.route_ordering {
        config.training.route_ordering = ordering.into();
    }

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        config.logging.level.parse().unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    config.validate().context("Invalid configuration")?;

    info!("Flight Price Trainer v{}", env!("CARGO_PKG_VERSION"));
    let started = chrono::Utc::now();
    info!("Run started at {}", started.to_rfc3339());

    let dataset_path = &config.training.dataset_path;
    info!("Loading dataset from: {}", dataset_path.display());
    let dataset = FlightDataset::from_csv(dataset_path).context("Failed to load dataset")?;
    info!("Loaded {} samples", dataset.len());
    if let Some((min, max)) = dataset.price_range() {
        info!("  Price range: {:.2} .. {:.2}", min, max);
    }

    let params = TrainingParams::from(&config.training);
    info!("Training configuration:");
    info!("  Seed: {}", params.seed);
    info!("  Test size: {}", params.test_size);
    info!("  Route ordering: {:?}", params.route_ordering);

    let store = FsArtifactStore::new(&config.artifacts.directory);
    let (metrics, report) = train_and_save(&dataset, params, &store, &config.artifacts.names())
        .context("Training failed")?;

    info!("Model metrics:");
    info!("  RMSE: {:.2}", metrics.rmse);
    info!("  MAE: {:.2}", metrics.mae);
    info!("  R²: {:.4}", metrics.r2);
    info!("Artifacts written to {}", store.directory().display());
    info!("  Model hash: {}", report.model_hash);
    info!(
        "Finished in {} ms",
        (chrono::Utc::now() - started).num_milliseconds()
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&metrics).context("Failed to serialize metrics")?
    );

    Ok(())
}
