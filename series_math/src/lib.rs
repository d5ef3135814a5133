//! # Series Math
//!
//! Numeric building blocks for indicator forecasting.
//! This crate provides streaming moving averages, column statistics and a
//! small ridge least-squares solver used by the forecasting core.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod statistics;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
