use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::utilities::{
    errors::{LabError, Result},
    ir::{
        baseline::{BL_END, BL_START, linear_bl_corr},
        fit_integrate_peak::{FitOptions, fit_integrate_peak},
        spectra::SpectraSeries,
    },
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TpdOptions {
    pub max_temperature: f64,
    pub baseline_start: f64,
    pub baseline_end: f64,
    pub fit: FitOptions,
}

impl Default for TpdOptions {
    fn default() -> Self {
        Self {
            max_temperature: 500.0,
            baseline_start: BL_START,
            baseline_end: BL_END,
            fit: FitOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TpdPoint {
    pub temperature: f64,
    /// NaN when the band fit failed.
    pub integral: f64,
    pub integral_by_weight: f64,
    pub converged: bool,
}

/// Spectra recorded before the temperature first exceeds `max_temperature`.
pub fn cut_tpd_dataset(series: &SpectraSeries, max_temperature: f64) -> Result<SpectraSeries> {
    let end = series
        .temperatures
        .iter()
        .position(|t| *t > max_temperature)
        .ok_or_else(|| {
            LabError::invalid(format!("no spectrum above {max_temperature} °C"))
        })?;
    Ok(series.rows(0, end))
}

/// Brønsted acid site desorption profile: the fitted band area of every
/// baseline-corrected spectrum, also per unit pellet weight.
pub fn get_tpd_bas(
    series: &SpectraSeries,
    pellet_weight: f64,
    options: Option<TpdOptions>,
) -> Result<Vec<TpdPoint>> {
    let o = options.unwrap_or_default();
    if !(pellet_weight > 0.0) {
        return Err(LabError::invalid("pellet weight must be positive"));
    }
    let cut = cut_tpd_dataset(series, o.max_temperature)?;
    let mut out = Vec::with_capacity(cut.len());
    for spectrum in cut.spectra() {
        let corr = linear_bl_corr(&spectrum, Some(o.baseline_start), Some(o.baseline_end))?;
        let temperature = spectrum.temperature.unwrap_or(f64::NAN);
        let (integral, converged) = match fit_integrate_peak(&corr, Some(o.fit)) {
            Ok(fit) => (fit.area, true),
            Err(LabError::Fit(message)) => {
                warn!(temperature, %message, "band fit failed");
                (f64::NAN, false)
            }
            Err(e) => return Err(e),
        };
        out.push(TpdPoint {
            temperature,
            integral,
            integral_by_weight: integral / pellet_weight,
            converged,
        });
    }
    info!(points = out.len(), peak_loc = o.fit.peak_loc, "built TPD profile");
    Ok(out)
}
