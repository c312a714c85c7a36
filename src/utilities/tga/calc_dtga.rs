use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::utilities::{
    errors::{LabError, Result},
    parse::parse_tga::parse_tga,
    sgg::{SggOptions, sgg},
    tga::tga_exp::{ExperimentKind, StageSelect, TgaExperiment},
    utilities::{gradient, nan_argmax, nearest_index, rolling_weighted_mean, triang_window},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Trailing triangular moving average of the numerical derivative.
    #[default]
    Triangular,
    /// Savitzky–Golay first derivative over the same window.
    SavitzkyGolay,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DtgaOptions {
    pub averaging_window: usize,
    pub smoothing: Smoothing,
    /// Polynomial order for `Smoothing::SavitzkyGolay`.
    pub polynomial: usize,
}

impl Default for DtgaOptions {
    fn default() -> Self {
        Self {
            averaging_window: 30,
            smoothing: Smoothing::Triangular,
            polynomial: 2,
        }
    }
}

fn neg_derivative(rel: &[f64], temp: &[f64], o: &DtgaOptions) -> Result<Vec<f64>> {
    match o.smoothing {
        Smoothing::Triangular => {
            let d: Vec<f64> = gradient(rel, temp).into_iter().map(|v| -v).collect();
            Ok(rolling_weighted_mean(&d, &triang_window(o.averaging_window)))
        }
        Smoothing::SavitzkyGolay => {
            let window_size = o.averaging_window | 1;
            let d = sgg(
                rel,
                temp,
                SggOptions {
                    window_size,
                    derivative: 1,
                    polynomial: o.polynomial,
                },
            )?;
            Ok(d.into_iter().map(|v| -v).collect())
        }
    }
}

/// Relative weights and DTGA curves for the cracking and burnoff stages, in
/// units of total weight (`twl`) and of polymer weight (`pwl`).
///
/// Rows at the starting sample temperature are dropped first; masses are taken
/// after that cut, stage by stage.
pub fn calc_dtga(exp: &mut TgaExperiment, options: Option<DtgaOptions>) -> Result<()> {
    let o = options.unwrap_or_default();
    if o.averaging_window == 0 {
        return Err(LabError::invalid("averaging window must be positive"));
    }
    for which in [StageSelect::Cracking, StageSelect::Burnoff] {
        let name = exp.stage_name(which)?.to_string();
        {
            let stage = exp
                .get_stage_mut(&name)
                .ok_or_else(|| LabError::MissingStage(name.clone()))?;
            let first = *stage
                .sample_temp
                .first()
                .ok_or(LabError::EmptyInput("TGA stage"))?;
            let keep: Vec<bool> = stage.sample_temp.iter().map(|t| *t != first).collect();
            stage.retain_rows(&keep);
        }

        let m_cat = exp.m_cat()?;
        let m_poly = exp.m_poly()?;

        let stage = exp
            .get_stage_mut(&name)
            .ok_or_else(|| LabError::MissingStage(name.clone()))?;
        let w_max = stage.max_weight()?;
        let rel_twl: Vec<f64> = stage.unsubtracted_weight.iter().map(|w| w / w_max).collect();
        let rel_pwl: Vec<f64> = stage
            .unsubtracted_weight
            .iter()
            .map(|w| (w - m_cat) / m_poly)
            .collect();

        stage.dtga_pwl = Some(neg_derivative(&rel_pwl, &stage.sample_temp, &o)?);
        stage.dtga_twl = Some(neg_derivative(&rel_twl, &stage.sample_temp, &o)?);
        stage.rel_weight_twl = Some(rel_twl);
        stage.rel_weight_pwl = Some(rel_pwl);
        debug!(stage = %name, rows = stage.len(), m_cat, m_poly, "computed DTGA");
    }
    Ok(())
}

/// Sample temperature at the maximum of the total-weight DTGA.
pub fn calc_tmax(exp: &TgaExperiment, which: StageSelect) -> Result<f64> {
    let stage = exp.select(which)?;
    let d = stage
        .dtga_twl
        .as_ref()
        .ok_or_else(|| LabError::invalid("DTGA has not been calculated"))?;
    let i = nan_argmax(d).ok_or(LabError::EmptyInput("DTGA curve"))?;
    // positional: `i` indexes the rows left after the first-temperature rows were dropped
    Ok(stage.sample_temp[i])
}

/// Sample temperature at which half of the polymer is gone.
pub fn calc_t50(exp: &TgaExperiment, which: StageSelect) -> Result<f64> {
    let stage = exp.select(which)?;
    let rel = stage
        .rel_weight_pwl
        .as_ref()
        .ok_or_else(|| LabError::invalid("relative weights have not been calculated"))?;
    let i = nearest_index(rel, 0.5).ok_or(LabError::EmptyInput("relative weight curve"))?;
    Ok(stage.sample_temp[i])
}

/// Reads a TGA8000 export and, when `dtga` is given, computes the DTGA curves.
pub fn load_tga(
    path: &Path,
    kind: ExperimentKind,
    dtga: Option<DtgaOptions>,
) -> Result<TgaExperiment> {
    let mut exp = parse_tga(path, kind)?;
    if dtga.is_some() {
        calc_dtga(&mut exp, dtga)?;
    }
    Ok(exp)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TgaSummary {
    pub kind: ExperimentKind,
    pub stages: Vec<String>,
    pub m_cat: f64,
    pub m_poly: f64,
    pub m_coke: f64,
    pub pct_loss: f64,
    pub p_c_ratio: f64,
    pub coke_yield: f64,
    pub temp: Option<f64>,
    pub t_max: Option<f64>,
    pub t_50: Option<f64>,
}

pub fn summarize(exp: &TgaExperiment) -> Result<TgaSummary> {
    let has_dtga = exp.cracking()?.dtga_twl.is_some();
    let summary = TgaSummary {
        kind: exp.kind,
        stages: exp.stage_names(),
        m_cat: exp.m_cat()?,
        m_poly: exp.m_poly()?,
        m_coke: exp.m_coke()?,
        pct_loss: exp.pct_loss()?,
        p_c_ratio: exp.p_c_ratio()?,
        coke_yield: exp.coke_yield()?,
        temp: match exp.kind {
            ExperimentKind::PyroIso => Some(exp.temp()?),
            _ => None,
        },
        t_max: if has_dtga {
            Some(calc_tmax(exp, StageSelect::Cracking)?)
        } else {
            None
        },
        t_50: if has_dtga {
            Some(calc_t50(exp, StageSelect::Cracking)?)
        } else {
            None
        },
    };
    info!(
        m_cat = summary.m_cat,
        m_poly = summary.m_poly,
        t_max = ?summary.t_max,
        "summarized TGA experiment"
    );
    Ok(summary)
}
