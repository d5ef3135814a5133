//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt;

/// Evaluation targets at or below this magnitude make MAPE meaningless
pub const MAPE_MIN_ABS_TARGET: f64 = 1.0;
/// A MAPE above this fraction is treated as not informative
pub const MAPE_MAX_REPORTED: f64 = 0.5;

/// Why MAPE was not reported
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapeGuard {
    /// An evaluation target is zero or negative
    NonPositiveTarget,
    /// An evaluation target has magnitude <= 1.0
    NearZeroTarget,
    /// The computed value exceeded the reporting threshold
    AboveThreshold(f64),
}

impl fmt::Display for MapeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapeGuard::NonPositiveTarget => write!(f, "targets include zero or negative values"),
            MapeGuard::NearZeroTarget => write!(f, "targets too close to zero"),
            MapeGuard::AboveThreshold(value) => write!(f, "{:.1}% exceeds the 50% limit", value * 100.0),
        }
    }
}

/// Mean absolute percentage error, as a fraction, or the reason it is absent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mape {
    Computed(f64),
    Unavailable(MapeGuard),
}

impl Mape {
    pub fn value(&self) -> Option<f64> {
        match self {
            Mape::Computed(value) => Some(*value),
            Mape::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Mape::Computed(_))
    }
}

/// Hold-out accuracy of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Mean Absolute Percentage Error
    pub mape: Mape,
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  R2:    {:.4}", self.r2)?;
        match self.mape {
            Mape::Computed(value) => write!(f, "  MAPE:  {:.2}%", value * 100.0),
            Mape::Unavailable(reason) => write!(f, "  MAPE:  n/a ({})", reason),
        }
    }
}

/// Evaluate predictions against actual values
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<ForecastMetrics> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Actual and predicted values must have the same non-zero length".to_string(),
        ));
    }

    Ok(ForecastMetrics {
        mae: mean_absolute_error(actual, predicted),
        rmse: root_mean_squared_error(actual, predicted),
        r2: r2_score(actual, predicted),
        mape: mape(actual, predicted),
    })
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// R²; constant actual values give 1.0 for a perfect fit and 0.0 otherwise
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// MAPE as a fraction, guarded against targets that distort it
pub fn mape(actual: &[f64], predicted: &[f64]) -> Mape {
    if actual.iter().any(|&a| a <= 0.0) {
        return Mape::Unavailable(MapeGuard::NonPositiveTarget);
    }
    if actual.iter().any(|&a| a.abs() <= MAPE_MIN_ABS_TARGET) {
        return Mape::Unavailable(MapeGuard::NearZeroTarget);
    }

    let value = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum::<f64>()
        / actual.len() as f64;

    if value > MAPE_MAX_REPORTED {
        Mape::Unavailable(MapeGuard::AboveThreshold(value))
    } else {
        Mape::Computed(value)
    }
}
