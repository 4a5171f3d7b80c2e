//! Shared numeric helpers: quantiles and polynomial least squares

use crate::error::{ForecastError, Result};
use std::cmp::Ordering;

/// Linear-interpolated quantile of `values` at `q` in `[0, 1]`.
///
/// Uses the estimator numpy and pandas default to: with the values sorted,
/// the quantile sits at fractional rank `(n - 1) * q` and neighbouring ranks
/// are blended linearly. Every quantile in the crate goes through this one
/// function so detection bounds and capacity thresholds stay reproducible.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(ForecastError::InvalidInput(
            "Cannot take a quantile of an empty slice".to_string(),
        ));
    }
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(ForecastError::InvalidInput(format!(
            "Quantile must be between 0 and 1, got {}",
            q
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = (sorted.len() - 1) as f64 * q;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// Linear-interpolated percentile of `values` at `p` in `[0, 100]`.
pub fn percentile(values: &[f64], p: f64) -> Result<f64> {
    quantile(values, p / 100.0)
}

/// Fit a polynomial of the given degree to `(x, y)` pairs by least squares.
///
/// Returns coefficients in ascending order of power. Needs strictly more
/// points than the degree; the normal equations are solved with Gaussian
/// elimination and partial pivoting.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(ForecastError::InvalidInput(format!(
            "x length ({}) doesn't match y length ({})",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() <= degree {
        return Err(ForecastError::InvalidInput(format!(
            "Polynomial of degree {} needs at least {} points, got {}",
            degree,
            degree + 1,
            xs.len()
        )));
    }

    let n = degree + 1;

    // Accumulate the power sums that make up the normal equations
    let mut power_sums = vec![0.0; 2 * degree + 1];
    for &x in xs {
        let mut p = 1.0;
        for sum in power_sums.iter_mut() {
            *sum += p;
            p *= x;
        }
    }

    let mut rhs = vec![0.0; n];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0;
        for value in rhs.iter_mut() {
            *value += y * p;
            p *= x;
        }
    }

    let mut matrix = vec![vec![0.0; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = power_sums[i + j];
        }
    }

    solve_linear_system(matrix, rhs)
}

/// Evaluate a polynomial (coefficients in ascending order) at `x`.
pub fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Gaussian elimination with partial pivoting.
fn solve_linear_system(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        // Pick the row with the largest pivot to keep the elimination stable
        let pivot_row = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(col);

        if matrix[pivot_row][col].abs() < 1e-12 {
            return Err(ForecastError::InvalidInput(
                "Polynomial fit is singular; lower the degree or add more points".to_string(),
            ));
        }

        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let mut value = rhs[row];
        for col in row + 1..n {
            value -= matrix[row][col] * solution[col];
        }
        solution[row] = value / matrix[row][row];
    }

    Ok(solution)
}
