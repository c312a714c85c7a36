use ndarray::Array2;
use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    structs::{Chromatogram1D, Chromatogram2D},
    utilities::finite_min,
};

const POINTS_TOLERANCE: f64 = 1e-6;

/// Zeroes the intensity up to and including `solvent_time` (seconds).
pub fn split_solvent(mut chrom: Chromatogram1D, solvent_time: f64) -> Chromatogram1D {
    for (t, y) in chrom.time.iter().zip(chrom.intensity.iter_mut()) {
        if *t <= solvent_time {
            *y = 0.0;
        }
    }
    chrom
}

/// Global minimum as baseline.
pub fn min_correct(mut chrom: Chromatogram1D) -> Chromatogram1D {
    if let Some(m) = finite_min(&chrom.intensity) {
        for y in chrom.intensity.iter_mut() {
            *y -= m;
        }
    }
    chrom
}

/// Number of samples in one modulation; `split_time` in s, `sampling_interval` in ms.
pub fn points_per_modulation(split_time: f64, sampling_interval: f64) -> Result<usize> {
    if !(split_time.is_finite() && split_time > 0.0) {
        return Err(LabError::invalid(format!(
            "split time must be positive, found {split_time}"
        )));
    }
    if !(sampling_interval.is_finite() && sampling_interval > 0.0) {
        return Err(LabError::invalid(format!(
            "sampling interval must be positive, found {sampling_interval}"
        )));
    }
    let points = split_time / sampling_interval * 1000.0;
    let rounded = points.round();
    if rounded < 1.0 || (points - rounded).abs() > POINTS_TOLERANCE {
        return Err(LabError::invalid(format!(
            "split time {split_time} s is not a whole number of {sampling_interval} ms samples"
        )));
    }
    Ok(rounded as usize)
}

/// Cuts the trace into consecutive modulations. A trailing partial modulation
/// is completed by repeating its last value.
pub fn modulate(
    chrom: &Chromatogram1D,
    split_time: f64,
    sampling_interval: f64,
) -> Result<Vec<Vec<f64>>> {
    if chrom.is_empty() {
        return Err(LabError::EmptyInput("chromatogram"));
    }
    let p = points_per_modulation(split_time, sampling_interval)?;
    let mut groups: Vec<Vec<f64>> = chrom.intensity.chunks(p).map(|c| c.to_vec()).collect();
    if let Some(last) = groups.last_mut() {
        let pad = last.last().copied().unwrap_or(0.0);
        if last.len() < p {
            debug!(missing = p - last.len(), "padding last modulation");
        }
        last.resize(p, pad);
    }
    Ok(groups)
}

#[inline]
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Folds the trace into a 2-D chromatogram. Columns are modulations, rows are
/// second-dimension times, latest first. The last modulation is dropped,
/// complete or not.
pub fn convert_to_2d(
    chrom: &Chromatogram1D,
    split_time: f64,
    sampling_interval: f64,
) -> Result<Chromatogram2D> {
    let groups = modulate(chrom, split_time, sampling_interval)?;
    let ncols = groups.len() - 1;
    if ncols == 0 {
        return Err(LabError::EmptyInput("chromatogram shorter than two modulations"));
    }
    let nrows = groups[0].len();

    let intensity = Array2::from_shape_fn((nrows, ncols), |(r, c)| groups[c][nrows - 1 - r]);
    let first_dim = (0..ncols).map(|i| i as f64 * split_time).collect();
    let second_dim = (0..nrows)
        .rev()
        .map(|j| round3(j as f64 * split_time / nrows as f64))
        .collect();

    debug!(rows = nrows, modulations = ncols, "folded chromatogram");
    Ok(Chromatogram2D {
        intensity,
        first_dim,
        second_dim,
    })
}
