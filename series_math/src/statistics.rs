//! Descriptive statistics over slices and matrix columns

use crate::{MathError, Result};

/// Arithmetic mean of a slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty slice".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`)
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|&value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Ok(variance.sqrt())
}

/// Mean and population standard deviation of one column of a row-major matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Per-column statistics of a row-major matrix.
///
/// Every row must have the same width as the first one.
pub fn column_stats(rows: &[Vec<f64>]) -> Result<Vec<ColumnStats>> {
    let width = match rows.first() {
        Some(first) => first.len(),
        None => {
            return Err(MathError::InsufficientData(
                "Cannot compute column statistics without rows".to_string(),
            ))
        }
    };

    if let Some(bad) = rows.iter().position(|row| row.len() != width) {
        return Err(MathError::InvalidInput(format!(
            "Row {} has {} columns, expected {}",
            bad,
            rows[bad].len(),
            width
        )));
    }

    (0..width)
        .map(|col| {
            let column: Vec<f64> = rows.iter().map(|row| row[col]).collect();
            Ok(ColumnStats {
                mean: mean(&column)?,
                std_dev: population_std_dev(&column)?,
            })
        })
        .collect()
}
