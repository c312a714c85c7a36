/// Index of the element closest to `v`, for data in any order. First wins on ties.
#[inline]
pub fn nearest_index(xs: &[f64], v: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in xs.iter().enumerate() {
        let d = (x - v).abs();
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// First index with `a[i] >= x`; `a` must be ascending.
#[inline]
pub fn lower_bound(a: &[f64], x: f64) -> usize {
    let mut lo = 0usize;
    let mut hi = a.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        if a[mid] < x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Trapezoidal rule with unit spacing.
#[inline]
pub fn trapezoid(y: &[f64]) -> f64 {
    let n = y.len();
    if n < 2 {
        return 0.0;
    }
    let mut s = 0.0f64;
    for w in y.windows(2) {
        s += (w[0] + w[1]) * 0.5;
    }
    s
}

/// Second order accurate central differences in the interior and first order
/// one-sided differences at the edges, for non-uniform `x`.
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len();
    if n < 2 || n != x.len() {
        return vec![f64::NAN; n];
    }
    let mut out = vec![0.0f64; n];
    out[0] = (y[1] - y[0]) / (x[1] - x[0]);
    out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..(n - 1) {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        let num = hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1];
        out[i] = num / (hs * hd * (hd + hs));
    }
    out
}

/// Triangular window of length `m` (endpoints non-zero).
pub fn triang_window(m: usize) -> Vec<f64> {
    if m == 0 {
        return Vec::new();
    }
    if m == 1 {
        return vec![1.0];
    }
    let half = (m + 1) / 2;
    let mut w: Vec<f64> = Vec::with_capacity(m);
    if m % 2 == 0 {
        for n in 1..=half {
            w.push((2 * n - 1) as f64 / m as f64);
        }
        for k in (0..half).rev() {
            w.push(w[k]);
        }
    } else {
        for n in 1..=half {
            w.push(2.0 * n as f64 / (m + 1) as f64);
        }
        for k in (0..half - 1).rev() {
            w.push(w[k]);
        }
    }
    w
}

/// Trailing weighted moving average. Positions before the window fills, or
/// whose window holds a non-finite value, are NaN.
pub fn rolling_weighted_mean(y: &[f64], weights: &[f64]) -> Vec<f64> {
    let n = y.len();
    let m = weights.len();
    let mut out = vec![f64::NAN; n];
    if m == 0 || n < m {
        return out;
    }
    let wsum: f64 = weights.iter().sum();
    if wsum == 0.0 {
        return out;
    }
    for i in (m - 1)..n {
        let window = &y[i + 1 - m..=i];
        if window.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let mut acc = 0.0f64;
        for (v, w) in window.iter().zip(weights) {
            acc += v * w;
        }
        out[i] = acc / wsum;
    }
    out
}

/// Position of the largest finite value.
#[inline]
pub fn nan_argmax(y: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in y.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, bv)) if bv >= v => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[inline]
pub fn finite_min(y: &[f64]) -> Option<f64> {
    y.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |m, v| Some(m.map_or(v, |m: f64| m.min(v))))
}

#[inline]
pub fn finite_max(y: &[f64]) -> Option<f64> {
    y.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |m, v| Some(m.map_or(v, |m: f64| m.max(v))))
}

#[inline]
pub fn mean(y: &[f64]) -> f64 {
    if y.is_empty() {
        return f64::NAN;
    }
    y.iter().sum::<f64>() / y.len() as f64
}
