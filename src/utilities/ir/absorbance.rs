use crate::utilities::{
    errors::{LabError, Result},
    ir::spectra::SpectraSeries,
    utilities::lower_bound,
};

/// Converts single-beam spectra to absorbance against `background`:
/// `|-log10(s) + log10(bg)|`.
pub fn to_absorbance(single_beam: &SpectraSeries, background: &[f64]) -> Result<SpectraSeries> {
    let cols = single_beam.wavenumbers.len();
    if background.len() != cols {
        return Err(LabError::ShapeMismatch {
            expected: (1, cols),
            found: (1, background.len()),
        });
    }
    let mut out = single_beam.clone();
    for mut row in out.values.rows_mut() {
        for (v, bg) in row.iter_mut().zip(background) {
            *v = (-v.log10() + bg.log10()).abs();
        }
    }
    Ok(out)
}

/// Oven temperature for each spectrum time: the first log entry at or after the
/// spectrum, or the last entry when the spectrum is later than the whole log.
/// `log_times` must be ascending.
pub fn assign_temperatures(
    spectrum_times: &[f64],
    log_times: &[f64],
    log_temps: &[f64],
) -> Result<Vec<f64>> {
    if log_times.is_empty() {
        return Err(LabError::EmptyInput("temperature log"));
    }
    if log_times.len() != log_temps.len() {
        return Err(LabError::invalid(format!(
            "log has {} times but {} temperatures",
            log_times.len(),
            log_temps.len()
        )));
    }
    let last = log_times.len() - 1;
    Ok(spectrum_times
        .iter()
        .map(|t| log_temps[lower_bound(log_times, *t).min(last)])
        .collect())
}

/// Replaces the temperature coordinate of `series` from a temperature log.
pub fn add_temperatures(
    series: &SpectraSeries,
    log_times: &[f64],
    log_temps: &[f64],
) -> Result<SpectraSeries> {
    let mut out = series.clone();
    out.temperatures = assign_temperatures(&series.times, log_times, log_temps)?;
    Ok(out)
}
