use ndarray::{Array2, Axis};

use crate::utilities::{
    errors::{LabError, Result},
    structs::Chromatogram2D,
    utilities::{finite_min, trapezoid},
};

/// Subtracts the minimum of every modulation (column).
pub fn baseline_stridewise(mut c2d: Chromatogram2D) -> Chromatogram2D {
    for mut col in c2d.intensity.axis_iter_mut(Axis(1)) {
        let values = col.to_vec();
        if let Some(m) = finite_min(&values) {
            col.mapv_inplace(|v| v - m);
        }
    }
    c2d
}

/// Rolls the rows circularly by `shift`; row `i` moves to `i + shift`.
pub fn shift_phase(mut c2d: Chromatogram2D, shift: isize) -> Chromatogram2D {
    let n = c2d.intensity.nrows();
    if n == 0 {
        return c2d;
    }
    let k = shift.rem_euclid(n as isize) as usize;
    if k == 0 {
        return c2d;
    }
    let src = &c2d.intensity;
    let rolled = Array2::from_shape_fn(src.dim(), |(r, c)| src[[(r + n - k) % n, c]]);
    c2d.intensity = rolled;
    c2d
}

/// Double trapezoidal integral with unit spacing, first over rows then over columns.
pub fn volume(a: &Array2<f64>) -> f64 {
    let per_column: Vec<f64> = a
        .axis_iter(Axis(1))
        .map(|col| trapezoid(&col.to_vec()))
        .collect();
    trapezoid(&per_column)
}

/// Scales the chromatogram to unit volume.
pub fn normalize_array(mut c2d: Chromatogram2D) -> Result<Chromatogram2D> {
    let v = volume(&c2d.intensity);
    if !v.is_finite() || v == 0.0 {
        return Err(LabError::ZeroVolume);
    }
    c2d.intensity.mapv_inplace(|x| x / v);
    Ok(c2d)
}
