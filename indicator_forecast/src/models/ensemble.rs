//! Linear base plus residual forest

use super::forest::RandomForest;
use super::{EnsembleParams, Regressor};
use crate::error::Result;
use series_math::regression::RidgeRegression;
use tracing::debug;

/// Regression ensemble: an optional ridge base with a forest on its residuals.
///
/// Trees only output values seen during training, so on their own they
/// flatten any trend past the last observation. The linear base carries the
/// trend and the forest models what is left.
#[derive(Debug, Clone)]
pub struct EnsembleModel {
    params: EnsembleParams,
    base: Option<RidgeRegression>,
    forest: RandomForest,
}

impl EnsembleModel {
    pub fn new(params: EnsembleParams) -> Result<Self> {
        params.validate()?;
        let forest = RandomForest::new(params.n_trees, params.tree_params(), params.seed)?;

        Ok(Self {
            params,
            base: None,
            forest,
        })
    }

    /// Fit the base, then the forest on the base's residuals
    pub fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        let (base, residuals) = match self.params.linear_penalty {
            Some(penalty) => {
                let mut ridge = RidgeRegression::new(penalty)?;
                ridge.fit(rows, targets)?;

                let mut residuals = Vec::with_capacity(targets.len());
                for (row, target) in rows.iter().zip(targets) {
                    residuals.push(target - ridge.predict(row)?);
                }

                debug!(
                    intercept = ridge.intercept()?,
                    coefficients = ?ridge.coefficients(),
                    "Fitted linear base"
                );
                (Some(ridge), residuals)
            }
            None => (None, targets.to_vec()),
        };

        self.forest.fit(rows, &residuals)?;
        self.base = base;
        Ok(())
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    pub fn base(&self) -> Option<&RidgeRegression> {
        self.base.as_ref()
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

impl Regressor for EnsembleModel {
    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        let base = match &self.base {
            Some(ridge) => ridge.predict(row)?,
            None => 0.0,
        };

        Ok(base + self.forest.predict_row(row)?)
    }
}
