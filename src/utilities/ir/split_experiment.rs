use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::utilities::{
    errors::{LabError, Result},
    ir::spectra::SpectraSeries,
};

/// Row boundaries of the phases of a pyridine IR experiment. Ranges are
/// half-open, `start..end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentIndices {
    pub start_bl: usize,
    pub end_bl: usize,
    pub start_dose: usize,
    pub end_dose: usize,
    pub start_desorb: usize,
    pub end_desorb: usize,
    pub start_dry: usize,
    pub end_dry: usize,
    #[serde(rename = "150_plateau")]
    pub plateau_150: usize,
}

impl Default for ExperimentIndices {
    /// Indices of the Z11 reference run.
    fn default() -> Self {
        Self {
            start_bl: 156,
            end_bl: 280,
            start_dose: 281,
            end_dose: 370,
            start_desorb: 371,
            end_desorb: 542,
            start_dry: 0,
            end_dry: 155,
            plateau_150: 420,
        }
    }
}

impl ExperimentIndices {
    /// Reads the first data row of an indices CSV; the header line is skipped
    /// and columns are taken by position.
    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let rec = rdr
            .records()
            .next()
            .ok_or(LabError::EmptyInput("indices file"))??;
        Ok(rec.deserialize(None)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.serialize(self)?;
        wtr.flush()?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct SplitExperiment {
    pub baseline: SpectraSeries,
    pub dose: SpectraSeries,
    pub desorb: SpectraSeries,
    pub dry: SpectraSeries,
}

/// Looks for a file with `indices` in its name in `dir`. Without one the Z11
/// defaults are used and, if `save` is set, written as
/// `<exp_name>_cutoff_indices.csv`.
pub fn find_indices(dir: &Path, exp_name: &str, save: bool) -> Result<ExperimentIndices> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains("indices"))
        })
        .collect();
    found.sort();

    if let Some(path) = found.first() {
        let idx = ExperimentIndices::load(path)?;
        info!(path = %path.display(), ?idx, "loaded experiment indices");
        return Ok(idx);
    }

    warn!(dir = %dir.display(), "no indices file found, using default indices");
    let idx = ExperimentIndices::default();
    if save {
        let out = dir.join(format!("{exp_name}_cutoff_indices.csv"));
        idx.save(&out)?;
        info!(path = %out.display(), "saved default indices");
    }
    Ok(idx)
}

pub fn split_experiment(series: &SpectraSeries, idx: &ExperimentIndices) -> SplitExperiment {
    SplitExperiment {
        baseline: series.rows(idx.start_bl, idx.end_bl),
        dose: series.rows(idx.start_dose, idx.end_dose),
        desorb: series.rows(idx.start_desorb, idx.end_desorb),
        dry: series.rows(idx.start_dry, idx.end_dry),
    }
}
