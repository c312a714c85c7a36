use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::utilities::{
    errors::Result,
    online_gc::{
        baseline_correct::{BaselineWindows, baseline_correct},
        integrate_peaks::{PeakTable, integrate_peaks, peak_names},
    },
    parse::parse_online_gc::parse_online_gc,
    utilities::mean,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InjectionIntegrals {
    pub path: PathBuf,
    pub injection_time: Option<String>,
    pub integrals: Vec<f64>,
}

/// One row per injection, columns in `peak_names` order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntegralTable {
    pub peak_names: Vec<String>,
    pub rows: Vec<InjectionIntegrals>,
}

impl IntegralTable {
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.peak_names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r.integrals[idx]).collect())
    }
}

/// Resolves chromatogram file names under `data_dir/chromatograms`, or
/// `data_dir/Chromatograms` when only that one exists.
pub fn chromatogram_paths(data_dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    let lower = data_dir.join("chromatograms");
    let upper = data_dir.join("Chromatograms");
    let base = if !lower.is_dir() && upper.is_dir() {
        upper
    } else {
        lower
    };
    names.iter().map(|n| base.join(n)).collect()
}

/// Parses, baseline-corrects and integrates every injection.
pub fn process_chromatograms(
    paths: &[PathBuf],
    table: &PeakTable,
    windows: BaselineWindows,
) -> Result<IntegralTable> {
    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let chrom = parse_online_gc(path)?;
        let chrom = baseline_correct(chrom, windows)?;
        let integrals = integrate_peaks(&chrom, table);
        if chrom.injection_time.is_none() {
            warn!(file = %path.display(), "no injection time in metadata");
        }
        rows.push(InjectionIntegrals {
            path: path.clone(),
            injection_time: chrom.injection_time,
            integrals,
        });
    }
    info!(injections = rows.len(), peaks = table.len(), "integrated online GC batch");
    Ok(IntegralTable {
        peak_names: peak_names(table),
        rows,
    })
}

/// Mean of `values` over the rows recorded at `temperature`, leaving out the
/// first two and last two of those rows. NaN when fewer than five rows match.
pub fn plateau_mean(temperatures: &[f64], values: &[f64], temperature: f64) -> f64 {
    let at: Vec<f64> = temperatures
        .iter()
        .zip(values)
        .filter(|(t, _)| **t == temperature)
        .map(|(_, v)| *v)
        .collect();
    if at.len() <= 4 {
        return f64::NAN;
    }
    mean(&at[2..at.len() - 2])
}
