//! Model evaluation for the five curve families.
//!
//! The fitters rely on three primitive operations:
//! - predict `y(x)` given parameters (for metrics, curves and plots)
//! - fill a Jacobian row for the nonlinear models (for Levenberg–Marquardt)
//! - render the closed-form formula for display
//!
//! These are implemented here for each model kind.

use crate::domain::ModelKind;

/// Predict `y(x)` for the given model kind.
///
/// Parameter layout: `[a, b]` for the two-parameter models, polynomial
/// coefficients highest power first (linear is the degree-1 polynomial).
pub fn predict(kind: ModelKind, x: f64, params: &[f64]) -> f64 {
    match kind {
        ModelKind::Linear | ModelKind::Polynomial => horner(x, params),
        ModelKind::Exponential => params[0] * (params[1] * x).exp(),
        ModelKind::Logarithmic => params[0] + params[1] * x.ln(),
        ModelKind::PowerLaw => params[0] * x.powf(params[1]),
    }
}

fn horner(x: f64, coeffs: &[f64]) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Fill the partial derivatives `∂y/∂a, ∂y/∂b` at `x`.
///
/// # Panics
/// Panics if `out` or `params` are shorter than 2. Only meaningful for the
/// nonlinear kinds; polynomial kinds are solved in closed form.
pub fn fill_jacobian_row(kind: ModelKind, x: f64, params: &[f64], out: &mut [f64]) {
    let (a, b) = (params[0], params[1]);
    match kind {
        ModelKind::Exponential => {
            let e = (b * x).exp();
            out[0] = e;
            out[1] = a * x * e;
        }
        ModelKind::Logarithmic => {
            out[0] = 1.0;
            out[1] = x.ln();
        }
        ModelKind::PowerLaw => {
            let p = x.powf(b);
            out[0] = p;
            out[1] = a * p * x.ln();
        }
        ModelKind::Linear | ModelKind::Polynomial => {
            out[0] = x;
            out[1] = 1.0;
        }
    }
}

/// Render the fitted formula, coefficients to two decimals.
pub fn format_formula(kind: ModelKind, params: &[f64]) -> String {
    match kind {
        ModelKind::Linear => format!("y = {}x + {}", fmt_coef(params[0]), fmt_coef(params[1])),
        ModelKind::Polynomial => {
            let degree = params.len().saturating_sub(1);
            let terms: Vec<String> = params
                .iter()
                .enumerate()
                .map(|(i, &c)| match degree - i {
                    0 => fmt_coef(c),
                    1 => format!("{}x", fmt_coef(c)),
                    p => format!("{}x^{p}", fmt_coef(c)),
                })
                .collect();
            format!("y = {}", terms.join(" + "))
        }
        ModelKind::Exponential => {
            format!("y = {}e^({}x)", fmt_coef(params[0]), fmt_coef(params[1]))
        }
        ModelKind::Logarithmic => {
            format!("y = {} + {}ln(x)", fmt_coef(params[0]), fmt_coef(params[1]))
        }
        ModelKind::PowerLaw => format!("y = {}x^{}", fmt_coef(params[0]), fmt_coef(params[1])),
    }
}

/// Two-decimal coefficient; values that round to zero print as `0.00`.
pub fn fmt_coef(v: f64) -> String {
    let s = format!("{v:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

/// Sample `n` evenly spaced points of the model over `[x_min, x_max]`.
pub fn sample_curve(kind: ModelKind, params: &[f64], x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let x = if i == n - 1 {
                x_max
            } else {
                let u = i as f64 / (n as f64 - 1.0);
                x_min + u * (x_max - x_min)
            };
            (x, predict(kind, x, params))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_each_kind() {
        assert_eq!(predict(ModelKind::Linear, 3.0, &[2.0, 1.0]), 7.0);
        assert_eq!(predict(ModelKind::Polynomial, 2.0, &[1.0, 0.0, -1.0]), 3.0);
        assert_eq!(predict(ModelKind::Exponential, 0.0, &[5.0, 3.0]), 5.0);
        assert_eq!(predict(ModelKind::Logarithmic, 1.0, &[4.0, 2.0]), 4.0);
        assert_eq!(predict(ModelKind::PowerLaw, 4.0, &[3.0, 0.5]), 6.0);
    }

    #[test]
    fn polynomial_formula_drops_low_exponents() {
        let f = format_formula(ModelKind::Polynomial, &[1.0, -2.5, 3.0]);
        assert_eq!(f, "y = 1.00x^2 + -2.50x + 3.00");
    }

    #[test]
    fn degree_ten_formula_keeps_x_to_the_tenth() {
        let mut coeffs = vec![0.0; 11];
        coeffs[0] = 1.0;
        let f = format_formula(ModelKind::Polynomial, &coeffs);
        assert!(f.starts_with("y = 1.00x^10 + 0.00x^9"), "{f}");
        assert!(f.ends_with("0.00x + 0.00"), "{f}");
    }

    #[test]
    fn two_parameter_formulas() {
        assert_eq!(format_formula(ModelKind::Linear, &[2.0, -1e-16]), "y = 2.00x + 0.00");
        assert_eq!(format_formula(ModelKind::Exponential, &[1.5, 0.25]), "y = 1.50e^(0.25x)");
        assert_eq!(format_formula(ModelKind::Logarithmic, &[1.0, 2.0]), "y = 1.00 + 2.00ln(x)");
        assert_eq!(format_formula(ModelKind::PowerLaw, &[3.0, 1.5]), "y = 3.00x^1.50");
    }

    #[test]
    fn curve_spans_range_monotonically() {
        let curve = sample_curve(ModelKind::Linear, &[1.0, 0.0], -2.0, 7.0, 500);
        assert_eq!(curve.len(), 500);
        assert_eq!(curve[0].0, -2.0);
        assert_eq!(curve[499].0, 7.0);
        assert!(curve.windows(2).all(|w| w[0].0 <= w[1].0));
    }
}
