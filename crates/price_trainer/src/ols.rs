//! Ordinary least squares
//!
//! The fit itself is `linfa_linear::LinearRegression` with an intercept.
//! Before fitting, columns that are constant or a linear combination of
//! earlier columns are screened out, since the normal equations are singular
//! with them. Screened columns get coefficient 0, which still yields a
//! least-squares solution.

use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};

use crate::errors::{Result, TrainerError};

/// Residual sum of squares, relative to the column's own centered sum of
/// squares, below which a column counts as dependent.
const RELATIVE_RANK_TOLERANCE: f64 = 1e-10;

/// Fitted coefficients and intercept
#[derive(Clone, Debug, PartialEq)]
pub struct OlsFit<const P: usize> {
    pub coefficients: [f64; P],
    pub intercept: f64,
    /// Columns dropped as constant or collinear
    pub dropped: Vec<usize>,
}

impl<const P: usize> OlsFit<P> {
    pub fn predict(&self, row: &[f64; P]) -> f64 {
        self.coefficients
            .iter()
            .zip(row.iter())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }
}

/// Fit `y ≈ X·β + b` minimizing squared residuals.
pub fn fit<const P: usize>(x: &[[f64; P]], y: &[f64]) -> Result<OlsFit<P>> {
    if x.len() != y.len() {
        return Err(TrainerError::Training(format!(
            "feature rows ({}) and targets ({}) differ in length",
            x.len(),
            y.len()
        )));
    }
    if x.is_empty() {
        return Err(TrainerError::Training("no rows to fit".to_string()));
    }
    if let Some(row) = x.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
        return Err(TrainerError::Training(format!("row {} has a non-finite feature", row)));
    }
    if let Some(row) = y.iter().position(|v| !v.is_finite()) {
        return Err(TrainerError::Training(format!("row {} has a non-finite target", row)));
    }

    let records = Array2::from_shape_vec((x.len(), P), x.iter().flatten().copied().collect())
        .map_err(|e| TrainerError::Training(format!("feature matrix: {}", e)))?;
    let targets = Array1::from_vec(y.to_vec());

    let (kept, dropped) = independent_columns(&records);
    let mut coefficients = [0.0; P];

    let intercept = if kept.is_empty() {
        // Nothing varies: the best constant is the mean target.
        targets.mean().unwrap_or_default()
    } else {
        let dataset = Dataset::new(records.select(Axis(1), &kept), targets);
        let fitted = LinearRegression::new()
            .fit(&dataset)
            .map_err(|e| TrainerError::Training(format!("least squares fit failed: {}", e)))?;

        for (&col, &coef) in kept.iter().zip(fitted.params().iter()) {
            coefficients[col] = coef;
        }
        fitted.intercept()
    };

    Ok(OlsFit {
        coefficients,
        intercept,
        dropped,
    })
}

/// Split column indices into a linearly independent set (after centering)
/// and the rest, scanning left to right with modified Gram-Schmidt.
fn independent_columns(records: &Array2<f64>) -> (Vec<usize>, Vec<usize>) {
    let mut basis: Vec<Array1<f64>> = Vec::new();
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for (col, column) in records.axis_iter(Axis(1)).enumerate() {
        let mean = column.mean().unwrap_or_default();
        let mut residual = column.mapv(|v| v - mean);
        let scale = residual.dot(&residual);

        for q in &basis {
            let projection = q.dot(&residual);
            residual.scaled_add(-projection, q);
        }
        let remaining = residual.dot(&residual);

        if scale <= 0.0 || remaining <= RELATIVE_RANK_TOLERANCE * scale {
            dropped.push(col);
            continue;
        }

        residual /= remaining.sqrt();
        basis.push(residual);
        kept.push(col);
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_recovers_exact_linear_relation() {
        // y = 3 + 2·x0 - 0.5·x1
        let x: Vec<[f64; 2]> = vec![[1.0, 4.0], [2.0, 1.0], [3.0, 7.0], [4.0, 2.0], [5.0, 5.0]];
        let y: Vec<f64> = x.iter().map(|r| 3.0 + 2.0 * r[0] - 0.5 * r[1]).collect();

        let fit = fit(&x, &y).unwrap();
        assert_close(fit.coefficients[0], 2.0);
        assert_close(fit.coefficients[1], -0.5);
        assert_close(fit.intercept, 3.0);
        assert!(fit.dropped.is_empty());
    }

    #[test]
    fn test_constant_column_gets_zero_coefficient() {
        let x: Vec<[f64; 2]> = vec![[1.0, 9.0], [2.0, 9.0], [3.0, 9.0], [4.0, 9.0]];
        let y = vec![10.0, 20.0, 30.0, 40.0];

        let fit = fit(&x, &y).unwrap();
        assert_close(fit.coefficients[0], 10.0);
        assert_eq!(fit.coefficients[1], 0.0);
        assert_close(fit.intercept, 0.0);
        assert_eq!(fit.dropped, vec![1]);
    }

    #[test]
    fn test_collinear_columns_still_fit() {
        // x1 = 2·x0, y = 4·x0 + 1
        let x: Vec<[f64; 2]> = vec![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [5.0, 10.0]];
        let y = vec![5.0, 9.0, 13.0, 21.0];

        let fit = fit(&x, &y).unwrap();
        assert_eq!(fit.dropped, vec![1]);
        assert_eq!(fit.coefficients[1], 0.0);
        for (row, target) in x.iter().zip(&y) {
            assert_close(fit.predict(row), *target);
        }
    }

    #[test]
    fn test_all_constant_columns_predict_mean() {
        let x: Vec<[f64; 2]> = vec![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0]];
        let y = vec![3.0, 6.0, 9.0];

        let fit = fit(&x, &y).unwrap();
        assert_eq!(fit.dropped, vec![0, 1]);
        assert_eq!(fit.coefficients, [0.0, 0.0]);
        assert_close(fit.intercept, 6.0);
    }

    #[test]
    fn test_least_squares_on_noisy_data() {
        let x: Vec<[f64; 1]> = vec![[0.0], [1.0], [2.0], [3.0]];
        let y = vec![1.0, 3.0, 2.0, 4.0];

        // Reference: slope 0.8, intercept 1.3
        let fit = fit(&x, &y).unwrap();
        assert_close(fit.coefficients[0], 0.8);
        assert_close(fit.intercept, 1.3);
    }

    #[test]
    fn test_rejects_empty_and_mismatched_input() {
        let empty: Vec<[f64; 2]> = Vec::new();
        assert!(fit(&empty, &[]).is_err());
        assert!(fit(&[[1.0, 2.0]], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        assert!(fit(&[[1.0], [f64::NAN]], &[1.0, 2.0]).is_err());
        assert!(fit(&[[1.0], [2.0]], &[1.0, f64::INFINITY]).is_err());
    }
}
