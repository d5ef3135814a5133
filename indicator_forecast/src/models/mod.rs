//! Regression models used by the forecasting ensemble

pub mod ensemble;
pub mod forest;
pub mod tree;

use crate::error::{ForecastError, Result};
use serde::Serialize;

pub use ensemble::EnsembleModel;
pub use forest::RandomForest;
pub use tree::{RegressionTree, TreeParams};

/// A fitted model that maps one row of inputs to a prediction
pub trait Regressor {
    /// Predict the target for a single row
    fn predict_row(&self, row: &[f64]) -> Result<f64>;

    /// Predict the target for every row
    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

/// Hyperparameters of the linear-plus-forest ensemble
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnsembleParams {
    /// Number of bootstrapped trees
    pub n_trees: usize,
    /// Maximum tree depth; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Seed of the master random generator
    pub seed: u64,
    /// L2 penalty of the linear base; `None` disables the base
    pub linear_penalty: Option<f64>,
}

impl EnsembleParams {
    /// Create validated ensemble parameters
    pub fn new(
        n_trees: usize,
        max_depth: Option<usize>,
        seed: u64,
        linear_penalty: Option<f64>,
    ) -> Result<Self> {
        let params = Self {
            n_trees,
            max_depth,
            min_samples_split: 2,
            seed,
            linear_penalty,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "Ensemble needs at least one tree".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "Max depth must be greater than zero".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ForecastError::InvalidParameter(
                "A split needs at least two samples".to_string(),
            ));
        }
        if let Some(penalty) = self.linear_penalty {
            if !penalty.is_finite() || penalty < 0.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "Linear penalty must be finite and non-negative, got {}",
                    penalty
                )));
            }
        }
        Ok(())
    }

    /// Parameters of each tree in the forest
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: 1,
        }
    }
}
