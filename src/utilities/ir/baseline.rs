use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    ir::spectra::{SpectraSeries, Spectrum},
    utilities::nearest_index,
};

pub const BL_START: f64 = 1564.0;
pub const BL_END: f64 = 1508.0;

/// Points with wavenumber in `[low, high]`.
pub fn get_slice(spectrum: &Spectrum, high: f64, low: f64) -> Spectrum {
    let (wavenumbers, values) = spectrum
        .wavenumbers
        .iter()
        .zip(&spectrum.values)
        .filter(|(w, _)| **w >= low && **w <= high)
        .map(|(w, v)| (*w, *v))
        .unzip();
    Spectrum {
        wavenumbers,
        values,
        temperature: spectrum.temperature,
        time: spectrum.time,
    }
}

/// Straight line through the spectrum values nearest to `start` and `end`,
/// evaluated over every wavenumber.
pub fn linear_baseline(spectrum: &Spectrum, start: f64, end: f64) -> Result<Vec<f64>> {
    if start == end {
        return Err(LabError::invalid("baseline anchors must differ"));
    }
    let i1 = nearest_index(&spectrum.wavenumbers, start)
        .ok_or(LabError::EmptyInput("spectrum"))?;
    let i2 =
        nearest_index(&spectrum.wavenumbers, end).ok_or(LabError::EmptyInput("spectrum"))?;
    let (y1, y2) = (spectrum.values[i1], spectrum.values[i2]);
    let m = (y2 - y1) / (end - start);
    let b = y1 - m * start;
    Ok(spectrum.wavenumbers.iter().map(|x| m * x + b).collect())
}

pub fn linear_bl_corr(spectrum: &Spectrum, start: Option<f64>, end: Option<f64>) -> Result<Spectrum> {
    let bl = linear_baseline(
        spectrum,
        start.unwrap_or(BL_START),
        end.unwrap_or(BL_END),
    )?;
    let mut out = spectrum.clone();
    for (v, b) in out.values.iter_mut().zip(bl) {
        *v -= b;
    }
    Ok(out)
}

/// Subtracts from each spectrum the baseline spectrum recorded at the closest
/// temperature.
pub fn baseline_subtract(bl: &SpectraSeries, spectra: &SpectraSeries) -> Result<SpectraSeries> {
    if bl.is_empty() {
        return Err(LabError::EmptyInput("baseline series"));
    }
    if bl.wavenumbers.len() != spectra.wavenumbers.len() {
        return Err(LabError::ShapeMismatch {
            expected: spectra.values.dim(),
            found: bl.values.dim(),
        });
    }
    let mut out = spectra.clone();
    for (i, t) in spectra.temperatures.iter().enumerate() {
        // NaN temperatures fall back to the first baseline spectrum
        let j = nearest_index(&bl.temperatures, *t).unwrap_or(0);
        let mut row = out.values.row_mut(i);
        row -= &bl.values.row(j);
    }
    debug!(spectra = out.len(), baselines = bl.len(), "subtracted baseline spectra");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_passes_through_anchors() {
        let wn: Vec<f64> = (0..100).map(|i| 1600.0 - i as f64).collect();
        let values: Vec<f64> = wn.iter().map(|w| 0.001 * w + 0.5).collect();
        let s = Spectrum::new(wn, values);
        let corr = linear_bl_corr(&s, None, None).unwrap();
        assert!(corr.values.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn slice_is_inclusive() {
        let wn = vec![1600.0, 1550.0, 1500.0, 1450.0];
        let s = Spectrum::new(wn, vec![1.0, 2.0, 3.0, 4.0]);
        let sl = get_slice(&s, 1550.0, 1500.0);
        assert_eq!(sl.values, vec![2.0, 3.0]);
    }
}
