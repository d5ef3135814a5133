//! Error types for the indicator_forecast crate
//!
//! Every failure is a recoverable value. Callers are expected to branch on the
//! variant and render an "unavailable" state rather than abort.

use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the indicator_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Not enough observations to train or to compute a statistic
    #[error("Insufficient history: need at least {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Target values contain missing or infinite entries
    #[error("Invalid target data: {0}")]
    InvalidTarget(String),

    /// A variation needs two points and a non-zero base
    #[error("Variation undefined over {points} point(s)")]
    UndefinedVariation { points: usize },

    /// Numerical failure while fitting the model
    #[error("Model fit failed: {0}")]
    FitFailed(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or ingestion
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON encoding or decoding
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidInput(msg) => ForecastError::InvalidParameter(msg),
            MathError::InsufficientData(msg) | MathError::CalculationError(msg) => {
                ForecastError::FitFailed(msg)
            }
        }
    }
}

impl ForecastError {
    /// Whether this error means "not enough data" rather than bad data or a bug
    pub fn is_insufficient_history(&self) -> bool {
        matches!(self, ForecastError::InsufficientHistory { .. })
    }
}
