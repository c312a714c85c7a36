// tests/helpers.rs
use labut::utilities::structs::DataXY;

/// Get one Gaussian value at x (bell curve). `base` lifts the whole curve.
#[inline]
pub fn gaussian_value(x: f64, mu: f64, sigma: f64, amp: f64, base: f64) -> f64 {
    base + amp * (-0.5 * ((x - mu) / sigma).powi(2)).exp()
}

/// One Lorentzian value at x with half width `gamma`.
#[allow(dead_code)]
#[inline]
pub fn lorentzian_value(x: f64, x0: f64, gamma: f64, amp: f64) -> f64 {
    amp * gamma * gamma / ((x - x0).powi(2) + gamma * gamma)
}

/// Build a signal made of one or more Gaussians, plus a constant `base` and optional small fake `noise`.
#[allow(dead_code)]
pub fn gaussian_mixture(xs: &[f64], peaks: &[(f64, f64, f64)], base: f64, noise: f64) -> Vec<f64> {
    xs.iter()
        .map(|&x| {
            let mut y = base;
            for &(mu, sigma, amp) in peaks {
                y += gaussian_value(x, mu, sigma, amp, 0.0);
            }
            if noise > 0.0 {
                let z = ((x * 137.13).sin() + (x * 73.7).cos()) * 0.5;
                y += z * noise;
            }
            y
        })
        .collect()
}

/// Make an even grid from start to end with n points (inclusive).
pub fn make_grid(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    (0..n)
        .map(|i| start + (end - start) * (i as f64) / ((n - 1) as f64))
        .collect()
}

/// Small deterministic wiggle in [-0.5, 0.5] you can use as repeatable “noise”.
#[allow(dead_code)]
pub fn jitter(i: u32) -> f64 {
    let mut x = i.wrapping_mul(1664525).wrapping_add(1013904223);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    (x as f64 / (u32::MAX as f64)) - 0.5
}

/// Check two numbers are close within a simple absolute tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Build a `DataXY` from x and y vectors.
#[allow(dead_code)]
pub fn data_xy(xs: Vec<f64>, ys: Vec<f64>) -> DataXY {
    DataXY { x: xs, y: ys }
}

/// TGA8000 data row: blank, time, weight, baseline, program temp, sample temp,
/// purge flows.
#[allow(dead_code)]
pub fn tga_row(time: f64, weight: f64, temp: f64) -> String {
    format!("\t{time}\t{weight}\t0\t{temp}\t{temp}\t20\t40")
}

/// TGA8000 export with one section per `(stage number, rows)`.
#[allow(dead_code)]
pub fn tga_export(stages: &[(u32, Vec<String>)]) -> String {
    let mut s = String::from("Filename:\tsample.txt\nOperator:\tlab\n\n");
    for (n, rows) in stages {
        s.push_str(&format!("{n}) TGA\n"));
        s.push_str("\tTime\tUnsubtracted Weight\tBaseline Weight\tProgram Temp.\tSample Temp.\tSample Purge Flow\tBalance Purge Flow\n");
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
    }
    s
}
