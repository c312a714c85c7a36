use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    ir::{
        lm::{LmOptions, lm_bounded},
        models::PeakModel,
        spectra::Spectrum,
    },
    structs::{DataXY, FromTo},
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Expected band position in cm⁻¹.
    pub peak_loc: f64,
    /// Half width of the window searched for the maximum.
    pub peak_window: f64,
    /// Half width of the fitted region around the maximum.
    pub fit_window: f64,
    pub model: PeakModel,
    pub initial_width: f64,
    pub initial_amplitude: f64,
    pub lm: LmOptions,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            peak_loc: 1545.0,
            peak_window: 25.0,
            fit_window: 15.0,
            model: PeakModel::Lorentzian,
            initial_width: 30.0,
            initial_amplitude: 0.2,
            lm: LmOptions::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakFit {
    pub area: f64,
    pub peak_intensity: f64,
    pub peak_position: f64,
    /// `[x0, width, amplitude]`
    pub parameters: Vec<f64>,
    pub fit_range: FromTo,
    pub model: PeakModel,
    /// Residual sum of squares of the fit.
    pub sse: f64,
}

impl PeakFit {
    /// Fitted line shape evaluated at `x`.
    pub fn curve(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.model.eval(v, &self.parameters)).collect()
    }
}

fn window(x: &[f64], y: &[f64], lo: f64, hi: f64) -> DataXY {
    let (wx, wy): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(w, _)| **w >= lo && **w <= hi)
        .map(|(w, v)| (*w, *v))
        .unzip();
    DataXY { x: wx, y: wy }
}

/// Fits one band and integrates the fitted line shape analytically.
///
/// The maximum is searched in `peak_loc ± peak_window`; the fit uses the points
/// of that window lying within `fit_window` of the maximum, starting from
/// `[x_max, initial_width, initial_amplitude]`. The centre is kept inside the
/// fitted region and the width positive. A fit that does not converge is a
/// `Fit` error.
pub fn fit_integrate_peak(spectrum: &Spectrum, options: Option<FitOptions>) -> Result<PeakFit> {
    let o = options.unwrap_or_default();
    if o.peak_window <= 0.0 || o.fit_window <= 0.0 {
        return Err(LabError::invalid("peak and fit windows must be positive"));
    }
    if !(o.initial_width > 0.0) {
        return Err(LabError::invalid("initial width must be positive"));
    }
    let search = window(
        &spectrum.wavenumbers,
        &spectrum.values,
        o.peak_loc - o.peak_window,
        o.peak_loc + o.peak_window,
    );

    let mut best: Option<(f64, f64)> = None;
    for (&x, &y) in search.x.iter().zip(&search.y) {
        if y.is_finite() && best.is_none_or(|(_, by)| y > by) {
            best = Some((x, y));
        }
    }
    let (x_max, peak_intensity) = best.ok_or(LabError::EmptyInput("peak search window"))?;

    let fit_range = FromTo {
        from: x_max - o.fit_window,
        to: x_max + o.fit_window,
    };
    let data = window(&search.x, &search.y, fit_range.from, fit_range.to);
    let p0 = [x_max, o.initial_width, o.initial_amplitude];
    let bounds = [
        fit_range,
        FromTo {
            from: f64::EPSILON,
            to: f64::INFINITY,
        },
        FromTo {
            from: f64::NEG_INFINITY,
            to: f64::INFINITY,
        },
    ];
    let model = o.model;
    let res = lm_bounded(&data, |x, p| model.eval(x, p), &p0, &bounds, Some(o.lm))?;
    if !res.converged {
        return Err(LabError::Fit(format!(
            "band at {} cm⁻¹ did not converge after {} iterations",
            o.peak_loc, res.iterations
        )));
    }
    debug!(iterations = res.iterations, sse = res.sse, "peak fit converged");

    Ok(PeakFit {
        area: model.area(&res.parameters),
        peak_intensity,
        peak_position: x_max,
        parameters: res.parameters,
        fit_range,
        model,
        sse: res.sse,
    })
}
