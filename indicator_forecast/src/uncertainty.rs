//! Confidence bands from historical dispersion

use crate::data::TimeSeries;
use crate::error::Result;
use serde::Serialize;

/// Two-sided 95% quantile of the standard normal distribution
pub const Z_95: f64 = 1.96;

/// Symmetric band around a point forecast.
///
/// The half-width is `1.96 * sigma` at every step, with sigma taken over the
/// whole history. It does not widen with the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub sigma: f64,
}

impl ConfidenceBand {
    pub fn half_width(&self) -> f64 {
        Z_95 * self.sigma
    }
}

/// Band around `forecast` from the sample standard deviation of `history`
pub fn confidence_band(history: &TimeSeries, forecast: &[f64]) -> Result<ConfidenceBand> {
    let sigma = history.std_dev()?;
    let half_width = Z_95 * sigma;

    Ok(ConfidenceBand {
        lower: forecast.iter().map(|v| v - half_width).collect(),
        upper: forecast.iter().map(|v| v + half_width).collect(),
        sigma,
    })
}
