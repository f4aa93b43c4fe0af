//! Linear price model trainer
//!
//! Builds the route vocabulary, encodes every row, fits OLS on a seeded
//! training partition and scores the held-out partition.

use flight_price_core::{
    extract_features, LinearModel, ModelArtifacts, ModelMetadata, RouteOrdering, RouteVocabulary,
    TrainingConfig, FEATURE_COUNT, FEATURE_NAMES,
};
use tracing::{debug, info};

use crate::dataset::FlightDataset;
use crate::deterministic::train_test_split;
use crate::errors::{Result, TrainerError};
use crate::metrics::{self, TrainingMetrics};
use crate::ols;

/// Training configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingParams {
    /// Seed of the train/test split
    pub seed: u64,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    pub route_ordering: RouteOrdering,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            seed: 42,
            test_size: 0.2,
            route_ordering: RouteOrdering::FirstSeen,
        }
    }
}

impl From<&TrainingConfig> for TrainingParams {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            seed: config.seed,
            test_size: config.test_size,
            route_ordering: config.route_ordering,
        }
    }
}

/// Output of a training run
#[derive(Clone, Debug)]
pub struct TrainedModel {
    pub model: LinearModel,
    pub routes: RouteVocabulary,
    pub metrics: TrainingMetrics,
}

impl TrainedModel {
    /// Split into the persistable pair and the report.
    pub fn into_parts(self) -> (ModelArtifacts, TrainingMetrics) {
        (ModelArtifacts::new(self.model, self.routes), self.metrics)
    }
}

/// Linear regression trainer
pub struct PriceTrainer {
    params: TrainingParams,
}

impl PriceTrainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    /// Train a model on the given dataset
    pub fn train(&self, dataset: &FlightDataset) -> Result<TrainedModel> {
        if !(self.params.test_size > 0.0 && self.params.test_size < 1.0) {
            return Err(TrainerError::Training(format!(
                "test_size must be in (0, 1), got {}",
                self.params.test_size
            )));
        }

        let routes = RouteVocabulary::build(dataset.route_keys(), self.params.route_ordering);
        info!("Route vocabulary built with {} routes", routes.len());

        let x: Vec<[f64; FEATURE_COUNT]> = dataset
            .records
            .iter()
            .map(|r| extract_features(&r.query, Some(&routes)).to_array())
            .collect();
        let y: Vec<f64> = dataset.records.iter().map(|r| r.price).collect();
        debug!("Feature matrix shape: ({}, {})", x.len(), FEATURE_COUNT);

        let split = train_test_split(x.len(), self.params.test_size, self.params.seed);
        if split.train.is_empty() || split.test.is_empty() {
            return Err(TrainerError::Dataset(format!(
                "{} rows cannot be split into non-empty train and test partitions",
                x.len()
            )));
        }
        info!("Train: {}, Test: {}", split.train.len(), split.test.len());

        let x_train: Vec<[f64; FEATURE_COUNT]> = split.train.iter().map(|&i| x[i]).collect();
        let y_train: Vec<f64> = split.train.iter().map(|&i| y[i]).collect();

        let fit = ols::fit(&x_train, &y_train)?;
        for &col in &fit.dropped {
            info!("Feature {} is constant or collinear, coefficient fixed at 0", FEATURE_NAMES[col]);
        }

        let y_test: Vec<f64> = split.test.iter().map(|&i| y[i]).collect();
        let y_pred: Vec<f64> = split.test.iter().map(|&i| fit.predict(&x[i])).collect();

        let metrics = TrainingMetrics {
            rmse: metrics::rmse(&y_test, &y_pred)?,
            mae: metrics::mae(&y_test, &y_pred)?,
            r2: metrics::r2(&y_test, &y_pred)?,
            samples: dataset.len(),
            features: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
        .rounded();

        let model = LinearModel::new(
            fit.coefficients,
            fit.intercept,
            ModelMetadata {
                training_rows: split.train.len(),
                seed: self.params.seed,
            },
        );

        Ok(TrainedModel {
            model,
            routes,
            metrics,
        })
    }
}
