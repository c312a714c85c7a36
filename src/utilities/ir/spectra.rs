use ndarray::{Array2, Axis, s};
use serde::{Deserialize, Serialize};

use crate::utilities::errors::{LabError, Result};

/// One IR spectrum. Wavenumbers usually run from high to low.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Spectrum {
    pub wavenumbers: Vec<f64>,
    pub values: Vec<f64>,
    pub temperature: Option<f64>,
    pub time: Option<f64>,
}

impl Spectrum {
    pub fn new(wavenumbers: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            wavenumbers,
            values,
            temperature: None,
            time: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Time series of spectra on a shared wavenumber axis. `values` has one row
/// per spectrum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpectraSeries {
    pub wavenumbers: Vec<f64>,
    /// Acquisition time, seconds since the Unix epoch.
    pub times: Vec<f64>,
    /// Sample temperature in °C, NaN when unknown.
    pub temperatures: Vec<f64>,
    pub values: Array2<f64>,
}

impl SpectraSeries {
    pub fn new(
        wavenumbers: Vec<f64>,
        times: Vec<f64>,
        temperatures: Vec<f64>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let (rows, cols) = values.dim();
        if cols != wavenumbers.len() || rows != times.len() || rows != temperatures.len() {
            return Err(LabError::ShapeMismatch {
                expected: (times.len(), wavenumbers.len()),
                found: (rows, cols),
            });
        }
        Ok(Self {
            wavenumbers,
            times,
            temperatures,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn spectrum(&self, i: usize) -> Option<Spectrum> {
        if i >= self.len() {
            return None;
        }
        Some(Spectrum {
            wavenumbers: self.wavenumbers.clone(),
            values: self.values.row(i).to_vec(),
            temperature: Some(self.temperatures[i]),
            time: Some(self.times[i]),
        })
    }

    pub fn spectra(&self) -> impl Iterator<Item = Spectrum> + '_ {
        (0..self.len()).filter_map(move |i| self.spectrum(i))
    }

    /// Rows `start..end`, clamped to the series.
    pub fn rows(&self, start: usize, end: usize) -> SpectraSeries {
        let end = end.min(self.len());
        let start = start.min(end);
        SpectraSeries {
            wavenumbers: self.wavenumbers.clone(),
            times: self.times[start..end].to_vec(),
            temperatures: self.temperatures[start..end].to_vec(),
            values: self.values.slice(s![start..end, ..]).to_owned(),
        }
    }

    /// Columns whose wavenumber lies within `[low, high]`.
    pub fn columns_between(&self, high: f64, low: f64) -> SpectraSeries {
        let keep: Vec<usize> = self
            .wavenumbers
            .iter()
            .enumerate()
            .filter(|(_, w)| **w >= low && **w <= high)
            .map(|(i, _)| i)
            .collect();
        SpectraSeries {
            wavenumbers: keep.iter().map(|&i| self.wavenumbers[i]).collect(),
            times: self.times.clone(),
            temperatures: self.temperatures.clone(),
            values: self.values.select(Axis(1), &keep),
        }
    }
}
