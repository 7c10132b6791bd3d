//! Goodness-of-fit metrics.

/// Coefficient of determination, `1 − SS_res / SS_tot`.
///
/// When `y_true` is constant `SS_tot` is zero and the result is NaN or
/// `-inf`; callers display it as-is.
pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean) * (t - mean)).sum();
    1.0 - ss_res / ss_tot
}

/// Mean absolute error and root mean square error.
pub fn errors(y_true: &[f64], y_pred: &[f64]) -> (f64, f64) {
    debug_assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len() as f64;
    let (abs_sum, sq_sum) = y_true
        .iter()
        .zip(y_pred)
        .fold((0.0, 0.0), |(a, s), (t, p)| {
            let r = t - p;
            (a + r.abs(), s + r * r)
        });
    (abs_sum / n, (sq_sum / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perfect_prediction_has_unit_r_squared() {
        let y = [1.0, 4.0, 2.5, -3.0];
        assert_eq!(r_squared(&y, &y), 1.0);
    }

    #[test]
    fn mean_prediction_has_zero_r_squared() {
        let y = [1.0, 2.0, 3.0];
        assert_abs_diff_eq!(r_squared(&y, &[2.0, 2.0, 2.0]), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn constant_truth_is_not_finite() {
        let y = [2.0, 2.0, 2.0];
        assert!(!r_squared(&y, &[2.0, 2.0, 2.0]).is_finite());
        assert!(!r_squared(&y, &[1.0, 2.0, 3.0]).is_finite());
    }

    #[test]
    fn rmse_dominates_mae() {
        let cases: [(&[f64], &[f64]); 3] = [
            (&[1.0, 2.0, 3.0], &[1.5, 1.0, 3.0]),
            (&[0.0, 0.0], &[1.0, -1.0]),
            (&[10.0, -4.0, 7.0, 2.0], &[9.0, -1.0, 7.5, 6.0]),
        ];
        for (t, p) in cases {
            let (mae, rmse) = errors(t, p);
            assert!(mae >= 0.0 && rmse >= 0.0);
            assert!(rmse + 1e-12 >= mae, "rmse={rmse} mae={mae}");
        }
    }

    #[test]
    fn equal_magnitude_residuals_give_equal_errors() {
        let (mae, rmse) = errors(&[0.0, 0.0], &[1.0, -1.0]);
        assert_abs_diff_eq!(mae, 1.0);
        assert_abs_diff_eq!(rmse, 1.0);
    }
}
