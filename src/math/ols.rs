//! Linear least squares.
//!
//! Polynomial fits (and the log-linearized starting points of the nonlinear
//! fits) reduce to problems of the form:
//!
//! ```text
//! minimize ‖X β − y‖²
//! ```
//!
//! Implementation choices:
//! - We solve via SVD so tall (more rows than columns) and rank-deficient
//!   design matrices are handled. (Nalgebra's `QR::solve` is intended for
//!   square systems and will panic for non-square matrices.)
//! - Vandermonde columns span many orders of magnitude at high degree, so
//!   each column is scaled to unit norm before solving and the solution is
//!   unscaled afterwards.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let scales: Vec<f64> = x
        .column_iter()
        .map(|col| {
            let norm = col.norm();
            if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
        })
        .collect();

    let mut scaled = x.clone();
    for (j, &s) in scales.iter().enumerate() {
        scaled.column_mut(j).scale_mut(1.0 / s);
    }

    let svd = scaled.svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                let unscaled = DVector::from_iterator(
                    beta.len(),
                    beta.iter().zip(&scales).map(|(b, s)| b / s),
                );
                return Some(unscaled);
            }
        }
    }

    None
}

/// Build the Vandermonde design matrix with the highest power first.
///
/// Row `i` is `[x_i^d, x_i^(d-1), …, x_i, 1]`.
pub fn vandermonde(x: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    let mut out = DMatrix::<f64>::zeros(x.len(), cols);
    for (i, &xi) in x.iter().enumerate() {
        let mut power = 1.0;
        for j in (0..cols).rev() {
            out[(i, j)] = power;
            power *= xi;
        }
    }
    out
}

/// Least squares polynomial coefficients, highest power first.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Option<Vec<f64>> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }
    let design = vandermonde(x, degree);
    let rhs = DVector::from_column_slice(y);
    solve_least_squares(&design, &rhs).map(|beta| beta.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn vandermonde_orders_highest_power_first() {
        let v = vandermonde(&[2.0, 3.0], 2);
        assert_eq!(v.row(0).iter().copied().collect::<Vec<_>>(), vec![4.0, 2.0, 1.0]);
        assert_eq!(v.row(1).iter().copied().collect::<Vec<_>>(), vec![9.0, 3.0, 1.0]);
    }

    #[test]
    fn polyfit_recovers_cubic_over_wide_range() {
        let x: Vec<f64> = (0..12).map(|i| i as f64 * 10.0).collect();
        let y: Vec<f64> = x.iter().map(|&v| 0.5 * v * v * v - 2.0 * v + 7.0).collect();
        let c = polyfit(&x, &y, 3).unwrap();
        assert_abs_diff_eq!(c[0], 0.5, epsilon = 1e-8);
        assert_abs_diff_eq!(c[1], 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c[2], -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(c[3], 7.0, epsilon = 1e-3);
    }
}
