//! Bagged forest of regression trees

use super::tree::{RegressionTree, TreeParams};
use super::Regressor;
use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Averages regression trees, each fitted on a bootstrap sample.
///
/// A master generator seeded with `seed` hands every tree its own seed, so
/// the fitted forest depends only on the data and `seed`.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_trees: usize,
    tree_params: TreeParams,
    seed: u64,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn new(n_trees: usize, tree_params: TreeParams, seed: u64) -> Result<Self> {
        if n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forest needs at least one tree".to_string(),
            ));
        }

        Ok(Self {
            n_trees,
            tree_params,
            seed,
            trees: Vec::with_capacity(n_trees),
        })
    }

    pub fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                actual: 0,
            });
        }

        let n = rows.len();
        let mut master = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);

        for _ in 0..self.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen::<u64>());
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut tree = RegressionTree::new(self.tree_params);
            tree.fit_indices(rows, targets, sample)?;
            trees.push(tree);
        }

        debug!(
            trees = trees.len(),
            samples = n,
            max_depth = trees.iter().map(RegressionTree::depth).max().unwrap_or(0),
            "Fitted forest"
        );

        self.trees = trees;
        Ok(())
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Regressor for RandomForest {
    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitFailed(
                "Forest has not been fitted".to_string(),
            ));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict_row(row)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}
