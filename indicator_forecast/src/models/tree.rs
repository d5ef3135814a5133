//! CART regression tree
//!
//! Splits minimise the summed squared error of the two children. Thresholds
//! sit halfway between adjacent distinct feature values and a sample goes
//! left when its value is `<=` the threshold.

use super::Regressor;
use crate::error::{ForecastError, Result};

/// Growth limits of a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Regression tree with nodes stored in a flat arena; node 0 is the root
#[derive(Debug, Clone)]
pub struct RegressionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    n_features: usize,
}

impl RegressionTree {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// Fit on every row once
    pub fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        let indices: Vec<usize> = (0..rows.len()).collect();
        self.fit_indices(rows, targets, indices)
    }

    /// Fit on the rows named by `indices`; repeats act as sample weights
    pub fn fit_indices(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
    ) -> Result<()> {
        if rows.len() != targets.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Row count ({}) doesn't match target count ({})",
                rows.len(),
                targets.len()
            )));
        }
        if indices.is_empty() {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                actual: 0,
            });
        }
        if indices.iter().any(|&i| i >= rows.len()) {
            return Err(ForecastError::InvalidParameter(
                "Sample index out of range".to_string(),
            ));
        }

        let n_features = rows[indices[0]].len();
        if rows.iter().any(|row| row.len() != n_features) {
            return Err(ForecastError::InvalidParameter(
                "All rows must have the same number of features".to_string(),
            ));
        }

        self.n_features = n_features;
        self.nodes.clear();
        self.nodes.push(Node::Leaf { value: 0.0 });

        let mut pending = vec![(0usize, indices, 0usize)];
        while let Some((node, samples, depth)) = pending.pop() {
            let value = mean_target(targets, &samples);
            self.nodes[node] = Node::Leaf { value };

            if !self.may_split(&samples, targets, depth) {
                continue;
            }

            let Some(split) = self.best_split(rows, targets, &samples) else {
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
                .iter()
                .partition(|&&i| rows[i][split.feature] <= split.threshold);

            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(Node::Leaf { value });
            self.nodes.push(Node::Leaf { value });
            self.nodes[node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            pending.push((right, right_samples, depth + 1));
            pending.push((left, left_samples, depth + 1));
        }

        Ok(())
    }

    fn may_split(&self, samples: &[usize], targets: &[f64], depth: usize) -> bool {
        if samples.len() < self.params.min_samples_split
            || samples.len() < 2 * self.params.min_samples_leaf
        {
            return false;
        }
        if self.params.max_depth.is_some_and(|max| depth >= max) {
            return false;
        }

        let first = targets[samples[0]];
        samples.iter().any(|&i| targets[i] != first)
    }

    /// Best split over all features, or `None` when no split lowers the error
    fn best_split(
        &self,
        rows: &[Vec<f64>],
        targets: &[f64],
        samples: &[usize],
    ) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = samples.iter().map(|&i| targets[i]).sum();
        // Maximising sum_l^2/n_l + sum_r^2/n_r minimises the children's SSE
        let parent_score = total * total / n as f64;
        let tolerance = f64::EPSILON * parent_score.abs().max(1.0);

        let mut best: Option<SplitCandidate> = None;
        let mut order = samples.to_vec();

        for feature in 0..self.n_features {
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left_sum = 0.0;
            for pos in 1..n {
                left_sum += targets[order[pos - 1]];

                let lower = rows[order[pos - 1]][feature];
                let upper = rows[order[pos]][feature];
                if lower == upper || pos < min_leaf || n - pos < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / pos as f64
                    + right_sum * right_sum / (n - pos) as f64;

                if score - parent_score <= tolerance {
                    continue;
                }
                if best.map_or(true, |b| score > b.score) {
                    let mut threshold = lower + (upper - lower) / 2.0;
                    if threshold >= upper {
                        threshold = lower;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best
    }

    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path, counted in splits
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = if self.is_fitted() {
            vec![(0usize, 0usize)]
        } else {
            Vec::new()
        };

        while let Some((node, depth)) = pending.pop() {
            match self.nodes[node] {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Split { left, right, .. } => {
                    pending.push((left, depth + 1));
                    pending.push((right, depth + 1));
                }
            }
        }

        deepest
    }
}

impl Regressor for RegressionTree {
    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if !self.is_fitted() {
            return Err(ForecastError::FitFailed("Tree has not been fitted".to_string()));
        }
        if row.len() != self.n_features {
            return Err(ForecastError::InvalidParameter(format!(
                "Tree fitted on {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let mut node = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

fn mean_target(targets: &[f64], samples: &[usize]) -> f64 {
    samples.iter().map(|&i| targets[i]).sum::<f64>() / samples.len() as f64
}
