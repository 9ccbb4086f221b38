//! Least squares regression with residuals.

use ndarray::{Array1, Array2};

use crate::MathError;

/// Result of a least squares fit.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients, in design matrix column order.
    pub coefficients: Array1<f64>,
    /// Residuals `y - X * beta`.
    pub residuals: Array1<f64>,
    /// R-squared.
    pub r_squared: f64,
}

/// Build an `(n x 2)` design matrix `[1 | regressor]`.
#[must_use]
pub fn design_with_intercept(regressor: &Array1<f64>) -> Array2<f64> {
    let n = regressor.len();
    let mut x = Array2::ones((n, 2));
    x.column_mut(1).assign(regressor);
    x
}

/// Ordinary least squares of `y` on the design matrix `x`.
///
/// # Errors
/// Returns error if dimensions mismatch, data is empty or `X'X` is singular.
pub fn ordinary_least_squares(y: &Array1<f64>, x: &Array2<f64>) -> Result<OlsResult, MathError> {
    weighted_least_squares(y, x, &Array1::ones(y.len()))
}

/// Perform weighted least squares regression.
///
/// Solves: argmin_beta sum((w_i * (y_i - X_i * beta))^2)
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x p)
/// * `weights` - Weight vector (n,) applied to rows before squaring
///
/// # Returns
/// Fit with coefficients and unweighted residuals.
///
/// # Errors
/// Returns error if dimensions mismatch or matrix is singular.
pub fn weighted_least_squares(
    y: &Array1<f64>,
    x: &Array2<f64>,
    weights: &Array1<f64>,
) -> Result<OlsResult, MathError> {
    let n = y.len();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if weights.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: weights.len() });
    }
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if y.iter().chain(x.iter()).chain(weights.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite regression input".to_string()));
    }

    let y_weighted = y * weights;
    let x_weighted = x * &weights.view().insert_axis(ndarray::Axis(1));

    // Normal equations: (X'WX) beta = X'Wy
    let xtx = x_weighted.t().dot(&x_weighted);
    let xty = x_weighted.t().dot(&y_weighted);
    let coefficients = solve_linear_system(&xtx, &xty)?;

    let fitted = x.dot(&coefficients);
    let residuals = y - &fitted;

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(OlsResult { coefficients, residuals, r_squared })
}

/// Solve a linear system Ax = b using Gaussian elimination with partial pivoting.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }

    // Pivots are compared against a tolerance relative to the matrix scale.
    let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(1.0);
    let tolerance = 1e-12 * scale;

    // Augmented matrix [A | b]
    let mut aug = Array2::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val < tolerance {
            return Err(MathError::LinearAlgebra(
                "matrix is singular or nearly singular".to_string(),
            ));
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    // Back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }

    Ok(x)
}
