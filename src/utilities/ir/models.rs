use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::LabError;

#[inline]
pub fn lorentzian(x: f64, x0: f64, gamma: f64, a: f64) -> f64 {
    a * gamma * gamma / ((x - x0).powi(2) + gamma * gamma)
}

#[inline]
pub fn gaussian(x: f64, x0: f64, sigma: f64, a: f64) -> f64 {
    a * (-(x - x0).powi(2) / (2.0 * sigma * sigma)).exp()
}

/// Line shape with parameters `[x0, width, amplitude]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakModel {
    #[default]
    Lorentzian,
    Gaussian,
}

impl PeakModel {
    #[inline]
    pub fn eval(&self, x: f64, p: &[f64]) -> f64 {
        match self {
            PeakModel::Lorentzian => lorentzian(x, p[0], p[1], p[2]),
            PeakModel::Gaussian => gaussian(x, p[0], p[1], p[2]),
        }
    }

    /// Integral over the whole real line.
    pub fn area(&self, p: &[f64]) -> f64 {
        match self {
            PeakModel::Lorentzian => (p[1] * p[2] * PI).abs(),
            PeakModel::Gaussian => ((2.0 * PI).sqrt() * p[1] * p[2]).abs(),
        }
    }
}

impl FromStr for PeakModel {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lorentzian" => Ok(PeakModel::Lorentzian),
            "gaussian" => Ok(PeakModel::Gaussian),
            other => Err(LabError::invalid(format!(
                "fit model must be 'lorentzian' or 'gaussian', found '{other}'"
            ))),
        }
    }
}
