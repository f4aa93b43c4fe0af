//! Price a single flight query from the command line.
//!
//! Uses the trained model in the artifact directory when present and the
//! fallback heuristic otherwise. Prints the estimate as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use flight_price_core::{
    predictor_from_config, CabinClass, Carrier, FlightQuery, PriceConfig, StopBucket, TimeBucket,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "estimate_price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Estimate a flight ticket price", long_about = None)]
struct Args {
    /// Carrier label (SpiceJet, AirAsia, Vistara, GO_FIRST, Indigo, Air_India)
    #[arg(long)]
    airline: String,

    #[arg(long)]
    source_city: String,

    #[arg(long)]
    destination_city: String,

    /// Early_Morning, Morning, Afternoon, Evening or Night
    #[arg(long)]
    departure_time: String,

    /// zero, one or two_or_more
    #[arg(long)]
    stops: String,

    #[arg(long)]
    arrival_time: String,

    /// Economy or Business
    #[arg(long, default_value = "Economy")]
    class: String,

    /// Flight duration in hours
    #[arg(long)]
    duration: f64,

    /// Days until departure
    #[arg(long)]
    days_left: u32,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Artifact directory (overrides the configuration)
    #[arg(short, long)]
    models: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Labels exactly as given, so unknown values stay visible in the output.
#[derive(Serialize)]
struct InputLabels<'a> {
    airline: &'a str,
    source_city: &'a str,
    destination_city: &'a str,
    departure_time: &'a str,
    stops: &'a str,
    arrival_time: &'a str,
    class: &'a str,
}

impl<'a> From<&'a Args> for InputLabels<'a> {
    fn from(args: &'a Args) -> Self {
        Self {
            airline: &args.airline,
            source_city: &args.source_city,
            destination_city: &args.destination_city,
            departure_time: &args.departure_time,
            stops: &args.stops,
            arrival_time: &args.arrival_time,
            class: &args.class,
        }
    }
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    price: f64,
    model: &'a str,
    input: InputLabels<'a>,
    query: &'a FlightQuery,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = match &args.config {
        Some(path) => PriceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PriceConfig::default(),
    };
    config.load_from_env().context("Invalid environment override")?;
    if let Some(dir) = args.models.clone() {
        config.artifacts.directory = dir;
    }
    config.validate().context("Invalid configuration")?;

    // Range checks belong to the caller of the core, i.e. here.
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("duration must be a positive number of hours, got {}", args.duration);
    }

    let query = FlightQuery {
        carrier: Carrier::from(args.airline.as_str()),
        origin: args.source_city.clone(),
        destination: args.destination_city.clone(),
        departure: TimeBucket::from(args.departure_time.as_str()),
        stops: StopBucket::from(args.stops.as_str()),
        arrival: TimeBucket::from(args.arrival_time.as_str()),
        cabin: CabinClass::from(args.class.as_str()),
        duration: args.duration,
        days_left: args.days_left,
    };
    debug!(?query, "Parsed query");

    let predictor = predictor_from_config(&config).context("Invalid pricing configuration")?;
    let estimate = predictor.predict(&query);

    let output = EstimateOutput {
        price: estimate.price,
        model: estimate.source.as_str(),
        input: InputLabels::from(&args),
        query: &query,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize estimate")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_keeps_unrecognized_labels() {
        let args = Args::try_parse_from([
            "estimate_price",
            "--airline",
            "Lufthansa",
            "--source-city",
            "Delhi",
            "--destination-city",
            "Mumbai",
            "--departure-time",
            "Morning",
            "--stops",
            "three",
            "--arrival-time",
            "Night",
            "--duration",
            "2.5",
            "--days-left",
            "10",
        ])
        .unwrap();

        let json = serde_json::to_value(InputLabels::from(&args)).unwrap();
        assert_eq!(json["airline"], "Lufthansa");
        assert_eq!(json["stops"], "three");
        assert_eq!(json["class"], "Economy");
        assert_eq!(Carrier::from(args.airline.as_str()), Carrier::Unknown);
    }
}
