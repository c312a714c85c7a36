use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utilities::errors::{LabError, Result};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SggOptions {
    pub window_size: usize,
    pub derivative: usize,
    pub polynomial: usize,
}

impl Default for SggOptions {
    fn default() -> Self {
        Self {
            window_size: 9,
            derivative: 0,
            polynomial: 3,
        }
    }
}

/// Savitzky–Golay filter on a (possibly non-uniform) grid. With `derivative > 0`
/// the result is scaled by the local mean step of `xs`.
pub fn sgg(ys: &[f64], xs: &[f64], opts: SggOptions) -> Result<Vec<f64>> {
    let window_size = opts.window_size;
    let derivative = opts.derivative;
    let polynomial = opts.polynomial;

    if window_size % 2 == 0 || window_size < 5 {
        return Err(LabError::invalid(
            "window size should be odd and at least 5",
        ));
    }
    if ys.is_empty() {
        return Err(LabError::EmptyInput("sgg y values"));
    }
    if xs.len() != ys.len() {
        return Err(LabError::invalid(format!(
            "x and y lengths differ {}!={}",
            xs.len(),
            ys.len()
        )));
    }
    if window_size > ys.len() {
        return Err(LabError::invalid(format!(
            "window size is higher than the data length {}>{}",
            window_size,
            ys.len()
        )));
    }
    if polynomial < 1 {
        return Err(LabError::invalid("polynomial should be a positive integer"));
    }
    if polynomial >= 6 {
        warn!(polynomial, "polynomial grade above 5 may oscillate");
    }

    let half = window_size / 2;
    let n = ys.len();

    let hs = get_hs(xs, half, derivative);
    let weights = full_weights(window_size, polynomial, derivative);

    let mut ans = vec![0.0f64; n];

    for i in 0..half {
        let wl = &weights[half - i - 1];
        let wr = &weights[half + i + 1];

        let mut dl = 0.0f64;
        let mut dr = 0.0f64;

        for l in 0..window_size {
            dl += wl[l] * ys[l];
            dr += wr[l] * ys[n - window_size + l];
        }

        let idx_l = half - i - 1;
        let idx_r = n - half + i;

        ans[idx_l] = dl / hs[idx_l];
        ans[idx_r] = dr / hs[idx_r];
    }

    let wc = &weights[half];
    for i in window_size..=n {
        let mut d = 0.0f64;
        for l in 0..window_size {
            d += wc[l] * ys[l + i - window_size];
        }
        let idx = i - half - 1;
        ans[idx] = d / hs[idx];
    }

    Ok(ans)
}

fn get_hs(xs: &[f64], half: usize, derivative: usize) -> Vec<f64> {
    let n = xs.len();
    if derivative == 0 || n < 2 {
        return vec![1.0f64; n];
    }

    let mut pref = vec![0.0f64; n];
    for i in 0..(n - 1) {
        pref[i + 1] = pref[i] + (xs[i + 1] - xs[i]);
    }

    let mut hs = vec![1.0f64; n];
    for c in 0..n {
        let start = c.saturating_sub(half);
        let end_excl = (c + half).min(n - 1);
        let count = end_excl.saturating_sub(start);
        let avg = if count > 0 {
            (pref[end_excl] - pref[start]) / (count as f64)
        } else {
            1.0
        };
        hs[c] = avg.powi(derivative as i32);
    }
    hs
}

fn full_weights(m: usize, n: usize, s: usize) -> Vec<Vec<f64>> {
    let half = (m / 2) as i32;
    let n_i = n as i32;
    let s_i = s as i32;

    let column = |off: i32, s_max: i32, col: usize| -> Vec<f64> {
        let tbl = gram_table(off, half, n_i, s_max);
        (0..=n).map(|k| tbl[k][col]).collect()
    };

    let gi: Vec<Vec<f64>> = (0..m).map(|idx| column(idx as i32 - half, 0, 0)).collect();
    let gt: Vec<Vec<f64>> = (0..m)
        .map(|idx| column(idx as i32 - half, s_i, s))
        .collect();

    let two_m = 2 * half;
    let coef: Vec<f64> = (0..=n_i)
        .map(|k| {
            let num = gen_fact(two_m, k);
            let den = gen_fact(two_m + k + 1, k + 1);
            (2 * k + 1) as f64 * (num / den)
        })
        .collect();

    let mut w = vec![vec![0.0f64; m]; m];
    for t_idx in 0..m {
        for j_idx in 0..m {
            let mut sum = 0.0f64;
            for k in 0..=n {
                sum += coef[k] * gi[j_idx][k] * gt[t_idx][k];
            }
            w[t_idx][j_idx] = sum;
        }
    }
    w
}

// Gram polynomials and their derivatives up to order `s_max`.
fn gram_table(i: i32, m: i32, n_max: i32, s_max: i32) -> Vec<Vec<f64>> {
    let nm = (n_max as usize) + 1;
    let sm = (s_max as usize) + 1;
    let mut g = vec![vec![0.0f64; sm]; nm];
    g[0][0] = 1.0;

    for k in 1..=n_max {
        let kf = k as f64;
        let denom = kf * (2 * m - k + 1) as f64;
        let a = (4 * k - 2) as f64 / denom;
        let b = ((k - 1) as f64 * (2 * m + k) as f64) / denom;
        let ku = k as usize;

        for s in 0..=s_max as usize {
            let term1 = (i as f64) * g[ku - 1][s];
            let term2 = if s > 0 { (s as f64) * g[ku - 1][s - 1] } else { 0.0 };
            let term3 = if k >= 2 { g[ku - 2][s] } else { 0.0 };
            g[ku][s] = a * (term1 + term2) - b * term3;
        }
    }
    g
}

fn gen_fact(a: i32, b: i32) -> f64 {
    if a >= b {
        ((a - b + 1)..=a).fold(1.0f64, |acc, j| acc * j as f64)
    } else {
        1.0
    }
}
