//! Linear least-squares regression
//!
//! Contains a multivariate ridge regression with an unpenalized intercept and
//! the dense linear solver it relies on.

use crate::{MathError, Result};

/// Ridge regression (L2-penalized least squares) with an intercept
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    penalty: f64,
    intercept: Option<f64>,
    coefficients: Vec<f64>,
}

impl RidgeRegression {
    /// Create a new ridge regression with the given L2 penalty
    pub fn new(penalty: f64) -> Result<Self> {
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(MathError::InvalidInput(
                "Penalty must be a finite, non-negative number".to_string(),
            ));
        }

        Ok(Self {
            penalty,
            intercept: None,
            coefficients: Vec::new(),
        })
    }

    /// Fit the coefficients on row-major inputs and their targets
    pub fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a regression without rows".to_string(),
            ));
        }
        if rows.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Row count ({}) doesn't match target count ({})",
                rows.len(),
                targets.len()
            )));
        }

        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(MathError::InvalidInput(
                "All rows must have the same number of columns".to_string(),
            ));
        }

        let n = rows.len() as f64;
        let y_mean = targets.iter().sum::<f64>() / n;
        let x_means: Vec<f64> = (0..width)
            .map(|col| rows.iter().map(|row| row[col]).sum::<f64>() / n)
            .collect();

        // Normal equations on centered data: (X'X + λI) β = X'y
        let mut gram = vec![vec![0.0; width]; width];
        let mut moment = vec![0.0; width];
        for (row, &y) in rows.iter().zip(targets) {
            let centered: Vec<f64> = row.iter().zip(&x_means).map(|(x, m)| x - m).collect();
            let dy = y - y_mean;
            for i in 0..width {
                moment[i] += centered[i] * dy;
                for j in i..width {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        for i in 0..width {
            gram[i][i] += self.penalty;
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
        }

        let coefficients = solve_linear_system(gram, moment)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_means)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        if !intercept.is_finite() {
            return Err(MathError::CalculationError(
                "Regression intercept is not finite".to_string(),
            ));
        }

        self.coefficients = coefficients;
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Predict the target for one row
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let intercept = self.intercept()?;
        if row.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} columns, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }

        Ok(intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, x)| b * x)
                .sum::<f64>())
    }

    /// Get the fitted intercept
    pub fn intercept(&self) -> Result<f64> {
        self.intercept.ok_or_else(|| {
            MathError::CalculationError("Regression parameters not calculated".to_string())
        })
    }

    /// Get the fitted coefficients (empty before fitting)
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get the L2 penalty
    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(
            "Linear system must be square and match the right-hand side".to_string(),
        ));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);

        if !a[pivot][col].is_finite() || a[pivot][col].abs() < 1e-12 {
            return Err(MathError::CalculationError(format!(
                "Matrix is singular at column {}",
                col
            )));
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Linear solve produced non-finite values".to_string(),
        ));
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_solve_small_system() {
        // 2x + y = 5, x + 3y = 10
        let x = solve_linear_system(vec![vec![2.0, 1.0], vec![1.0, 3.0]], vec![5.0, 10.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_system_is_an_error() {
        let result = solve_linear_system(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]);
        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_ridge_recovers_linear_relation() {
        let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let targets: Vec<f64> = rows.iter().map(|r| 5.0 + 2.0 * r[0] - r[1]).collect();

        let mut ridge = RidgeRegression::new(1e-9).unwrap();
        ridge.fit(&rows, &targets).unwrap();

        assert_abs_diff_eq!(ridge.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ridge.coefficients()[1], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ridge.predict(&[30.0, 1.0]).unwrap(), 64.0, epsilon = 1e-5);
    }

    #[test]
    fn test_constant_target_gives_zero_coefficients() {
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let targets = vec![10.0; 10];

        let mut ridge = RidgeRegression::new(1e-3).unwrap();
        ridge.fit(&rows, &targets).unwrap();

        assert_eq!(ridge.coefficients(), &[0.0]);
        assert_eq!(ridge.predict(&[42.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_unfitted_and_invalid_inputs() {
        let ridge = RidgeRegression::new(0.1).unwrap();
        assert!(ridge.predict(&[1.0]).is_err());
        assert!(RidgeRegression::new(-1.0).is_err());
        assert!(RidgeRegression::new(f64::NAN).is_err());
    }
}
