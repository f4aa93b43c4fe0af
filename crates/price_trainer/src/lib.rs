//! Flight price trainer - deterministic offline linear regression
//!
//! Loads historical flights from CSV, fits the price model and persists the
//! model together with its route vocabulary. Identical data and seed always
//! reproduce the same split, coefficients and metrics.

pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod metrics;
pub mod ols;
pub mod trainer;

use flight_price_core::{ArtifactNames, ArtifactStore, SaveReport};
use std::path::Path;
use tracing::info;

pub use dataset::{FlightDataset, FlightRecord, REQUIRED_COLUMNS};
pub use deterministic::{train_test_split, LcgRng, Split};
pub use errors::TrainerError;
pub use metrics::TrainingMetrics;
pub use trainer::{PriceTrainer, TrainedModel, TrainingParams};

/// Train a model directly from a CSV file using the provided parameters.
pub fn train_model_from_csv(path: &Path, params: TrainingParams) -> Result<TrainedModel, TrainerError> {
    let dataset = FlightDataset::from_csv(path)?;
    info!("Loaded {} rows from {}", dataset.len(), path.display());
    PriceTrainer::new(params).train(&dataset)
}

/// Train and persist the model pair. Nothing is written if training fails.
pub fn train_and_save<S: ArtifactStore>(
    dataset: &FlightDataset,
    params: TrainingParams,
    store: &S,
    names: &ArtifactNames,
) -> Result<(TrainingMetrics, SaveReport), TrainerError> {
    let trained = PriceTrainer::new(params).train(dataset)?;

    for (name, coef) in trained.model.coefficients_by_feature() {
        info!("  {}: {:.2}", name, coef);
    }

    let (artifacts, metrics) = trained.into_parts();
    let report = artifacts.save(store, names)?;
    Ok((metrics, report))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
