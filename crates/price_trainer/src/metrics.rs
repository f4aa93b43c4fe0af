//! Held-out evaluation metrics

use linfa::prelude::SingleTargetRegression;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrainerError};

/// Evaluation summary returned by a training run. Not persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    /// Rows in the whole dataset
    pub samples: usize,
    /// Feature names in schema order
    pub features: Vec<String>,
}

impl TrainingMetrics {
    /// Copy rounded for reporting: RMSE/MAE to cents, R² to 4 places.
    pub fn rounded(&self) -> Self {
        Self {
            rmse: round_to(self.rmse, 2),
            mae: round_to(self.mae, 2),
            r2: round_to(self.r2, 4),
            samples: self.samples,
            features: self.features.clone(),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Predicted and actual views, checked for equal length.
fn paired<'a>(actual: &'a [f64], predicted: &'a [f64]) -> Result<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)> {
    if actual.len() != predicted.len() {
        return Err(TrainerError::Training(format!(
            "{} targets but {} predictions",
            actual.len(),
            predicted.len()
        )));
    }
    Ok((ArrayView1::from(actual), ArrayView1::from(predicted)))
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (actual_view, predicted_view) = paired(actual, predicted)?;
    if actual.is_empty() {
        return Ok(0.0);
    }
    Ok(predicted_view.mean_squared_error(&actual_view)?.sqrt())
}

pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (actual_view, predicted_view) = paired(actual, predicted)?;
    if actual.is_empty() {
        return Ok(0.0);
    }
    Ok(predicted_view.mean_absolute_error(&actual_view)?)
}

/// Coefficient of determination. A constant target scores 1.0 when
/// predicted exactly and 0.0 otherwise.
pub fn r2(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    let (actual_view, predicted_view) = paired(actual, predicted)?;
    if actual.is_empty() {
        return Ok(0.0);
    }

    if actual.iter().all(|&a| a == actual[0]) {
        let exact = predicted_view.mean_squared_error(&actual_view)? == 0.0;
        return Ok(if exact { 1.0 } else { 0.0 });
    }
    Ok(predicted_view.r2(&actual_view)?)
}
