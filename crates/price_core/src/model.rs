//! Linear price model
//!
//! Holds the coefficients fitted by the trainer. A model is immutable once
//! produced; inference reads it through shared references only.

use serde::{Deserialize, Serialize};

use crate::errors::{PriceError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Name reported for estimates produced by this model.
pub const MODEL_KIND: &str = "linear_regression";

/// Training provenance stored with the model. Holds only values fixed by the
/// dataset and seed, so retraining on the same input yields the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Rows in the training partition
    pub training_rows: usize,
    /// Seed of the train/test split
    pub seed: u64,
}

/// Ordinary-least-squares regression over the fixed feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Feature names the coefficients were fitted against, in schema order
    pub feature_names: Vec<String>,
    /// One coefficient per schema position
    pub coefficients: Vec<f64>,
    /// Constant term
    pub intercept: f64,
    pub metadata: ModelMetadata,
}

impl LinearModel {
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64, metadata: ModelMetadata) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            coefficients: coefficients.to_vec(),
            intercept,
            metadata,
        }
    }

    /// Raw regression output: dot product plus intercept, unclamped.
    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Coefficients paired with their feature names.
    pub fn coefficients_by_feature(&self) -> Vec<(&str, f64)> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    /// Check that the model matches the current feature schema.
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(PriceError::InvalidModel(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }

        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(a, b)| a != b)
        {
            return Err(PriceError::InvalidModel(format!(
                "feature schema mismatch: {:?}",
                self.feature_names
            )));
        }

        if let Some(idx) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(PriceError::InvalidModel(format!(
                "coefficient for {} is not finite",
                FEATURE_NAMES[idx]
            )));
        }

        if !self.intercept.is_finite() {
            return Err(PriceError::InvalidModel("intercept is not finite".to_string()));
        }

        Ok(())
    }
}
