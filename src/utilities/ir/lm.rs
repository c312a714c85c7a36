use serde::{Deserialize, Serialize};

use crate::utilities::{
    errors::{LabError, Result},
    structs::{DataXY, FromTo},
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LmOptions {
    pub max_iterations: usize,
    /// Relative reduction of the residual sum of squares considered converged.
    pub ftol: f64,
    /// Relative step size considered converged.
    pub xtol: f64,
    pub initial_lambda: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-12,
            xtol: 1e-12,
            initial_lambda: 1e-3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LmResult {
    pub parameters: Vec<f64>,
    pub iterations: usize,
    pub sse: f64,
    pub converged: bool,
}

const LAMBDA_MAX: f64 = 1e16;
const GRAD_TOL: f64 = 1e-15;

fn sse<F: Fn(f64, &[f64]) -> f64>(data: &DataXY, model: &F, p: &[f64]) -> f64 {
    data.x
        .iter()
        .zip(&data.y)
        .map(|(&x, &y)| (y - model(x, p)).powi(2))
        .sum()
}

/// Levenberg–Marquardt least squares with a forward-difference Jacobian.
pub fn lm<F: Fn(f64, &[f64]) -> f64>(
    data: &DataXY,
    model: F,
    p0: &[f64],
    options: Option<LmOptions>,
) -> Result<LmResult> {
    lm_bounded(data, model, p0, &[], options)
}

#[inline]
fn within(p: &[f64], bounds: &[FromTo]) -> bool {
    bounds
        .iter()
        .zip(p)
        .all(|(b, v)| *v >= b.from && *v <= b.to)
}

/// Levenberg–Marquardt restricted to a box: steps leaving `bounds` are
/// rejected like uphill ones. Empty `bounds` means unconstrained.
///
/// Damping uses the running maximum of the normal-matrix diagonal, so a
/// parameter whose curvature collapses keeps its step bounded.
pub fn lm_bounded<F: Fn(f64, &[f64]) -> f64>(
    data: &DataXY,
    model: F,
    p0: &[f64],
    bounds: &[FromTo],
    options: Option<LmOptions>,
) -> Result<LmResult> {
    let o = options.unwrap_or_default();
    let n = data.x.len();
    let m = p0.len();
    if !bounds.is_empty() && bounds.len() != m {
        return Err(LabError::Fit(format!(
            "{} bounds given for {m} parameters",
            bounds.len()
        )));
    }
    if !within(p0, bounds) {
        return Err(LabError::Fit("initial guess lies outside the bounds".into()));
    }
    if n != data.y.len() {
        return Err(LabError::Fit(format!("x/y length mismatch {}!={}", n, data.y.len())));
    }
    if m == 0 || n < m {
        return Err(LabError::Fit(format!(
            "{n} points cannot determine {m} parameters"
        )));
    }
    if data.x.iter().chain(&data.y).any(|v| !v.is_finite()) {
        return Err(LabError::Fit("input contains non-finite values".into()));
    }

    let mut p = p0.to_vec();
    let mut cost = sse(data, &model, &p);
    if !cost.is_finite() {
        return Err(LabError::Fit("initial guess gives a non-finite residual".into()));
    }

    let mut lambda = o.initial_lambda;
    let mut converged = false;
    let mut it = 0usize;
    let mut jac = vec![vec![0.0f64; m]; n];
    let mut resid = vec![0.0f64; n];
    let mut scale = vec![0.0f64; m];

    while it < o.max_iterations && !converged {
        it += 1;
        for i in 0..n {
            let f0 = model(data.x[i], &p);
            resid[i] = data.y[i] - f0;
            for j in 0..m {
                let h = 1.490_116_119_384_765_6e-8 * p[j].abs().max(1.0);
                let mut q = p.clone();
                q[j] += h;
                jac[i][j] = (model(data.x[i], &q) - f0) / h;
            }
        }

        let mut a = vec![vec![0.0f64; m]; m];
        let mut g = vec![0.0f64; m];
        for i in 0..n {
            for j in 0..m {
                g[j] += jac[i][j] * resid[i];
                for k in 0..m {
                    a[j][k] += jac[i][j] * jac[i][k];
                }
            }
        }
        if g.iter().all(|v| v.abs() <= GRAD_TOL) {
            converged = true;
            break;
        }
        for j in 0..m {
            scale[j] = scale[j].max(a[j][j]);
        }

        loop {
            let mut damped = a.clone();
            for j in 0..m {
                damped[j][j] += lambda * scale[j].max(1e-12);
            }
            let step = solve_linear(damped, g.clone());
            let accepted = step.and_then(|d| {
                let q: Vec<f64> = p.iter().zip(&d).map(|(pi, di)| pi + di).collect();
                if !within(&q, bounds) {
                    return None;
                }
                let c = sse(data, &model, &q);
                (c.is_finite() && c < cost).then_some((q, d, c))
            });
            match accepted {
                Some((q, d, c)) => {
                    let dp = d.iter().map(|v| v * v).sum::<f64>().sqrt();
                    let pn = p.iter().map(|v| v * v).sum::<f64>().sqrt();
                    if cost - c <= o.ftol * cost || dp <= o.xtol * (pn + o.xtol) {
                        converged = true;
                    }
                    p = q;
                    cost = c;
                    lambda = (lambda / 10.0).max(1e-15);
                    break;
                }
                None => {
                    lambda *= 10.0;
                    if lambda > LAMBDA_MAX {
                        // no downhill step left at machine precision
                        converged = true;
                        break;
                    }
                }
            }
        }
    }

    Ok(LmResult {
        parameters: p,
        iterations: it,
        sse: cost,
        converged,
    })
}

/// Gaussian elimination with partial pivoting. `None` when singular.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let mut piv = col;
        for r in (col + 1)..n {
            if a[r][col].abs() > a[piv][col].abs() {
                piv = r;
            }
        }
        if a[piv][col].abs() < 1e-300 || !a[piv][col].is_finite() {
            return None;
        }
        a.swap(col, piv);
        b.swap(col, piv);
        for r in (col + 1)..n {
            let f = a[r][col] / a[col][col];
            for c in col..n {
                a[r][c] -= f * a[col][c];
            }
            b[r] -= f * b[col];
        }
    }
    let mut x = vec![0.0f64; n];
    for r in (0..n).rev() {
        let mut s = b[r];
        for c in (r + 1)..n {
            s -= a[r][c] * x[c];
        }
        x[r] = s / a[r][r];
    }
    if x.iter().all(|v| v.is_finite()) { Some(x) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve_linear(a, vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn fits_a_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
        let r = lm(&DataXY { x, y }, |x, p| p[0] * x + p[1], &[1.0, 0.0], None).unwrap();
        assert!(r.converged);
        assert!((r.parameters[0] - 3.0).abs() < 1e-6);
        assert!((r.parameters[1] + 2.0).abs() < 1e-6);
    }

    #[test]
    fn guess_outside_bounds_is_rejected() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y = x.clone();
        let bounds = [FromTo { from: 2.0, to: 4.0 }];
        let err = lm_bounded(&DataXY { x, y }, |x, p| p[0] * x, &[1.0], &bounds, None).unwrap_err();
        assert!(matches!(err, LabError::Fit(_)));
    }

    // the slope is pinned at the upper bound when the optimum lies beyond it
    #[test]
    fn steps_stay_inside_bounds() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 5.0 * v).collect();
        let bounds = [FromTo { from: 0.0, to: 3.0 }];
        let r = lm_bounded(&DataXY { x, y }, |x, p| p[0] * x, &[1.0], &bounds, None).unwrap();
        assert!(r.parameters[0] <= 3.0 && r.parameters[0] > 1.0);
    }
}
