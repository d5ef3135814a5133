//! Per-column standardization of model inputs

use crate::error::{ForecastError, Result};
use serde::Serialize;
use series_math::statistics::column_stats;

/// Centers each column on its mean and divides by its population standard
/// deviation. Columns with zero spread keep a scale of 1.0.
///
/// Once fitted the parameters are frozen; every later transform reuses them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit the scaler on row-major training inputs
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let stats = column_stats(rows)?;

        let means: Vec<f64> = stats.iter().map(|s| s.mean).collect();
        let scales: Vec<f64> = stats
            .iter()
            .map(|s| if s.std_dev == 0.0 { 1.0 } else { s.std_dev })
            .collect();

        if means.iter().chain(&scales).any(|v| !v.is_finite()) {
            return Err(ForecastError::FitFailed(
                "Scaler parameters are not finite".to_string(),
            ));
        }

        Ok(Self { means, scales })
    }

    /// Standardize one row
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.means.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Scaler fitted on {} columns, got {}",
                self.means.len(),
                row.len()
            )));
        }

        let scaled: Vec<f64> = row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitFailed(
                "Scaled features are not finite".to_string(),
            ));
        }

        Ok(scaled)
    }

    /// Standardize every row
    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }
}
