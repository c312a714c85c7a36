use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    parse::parse_tga::parse_stage_csv,
    utilities::{finite_max, finite_min},
};

/// One row of a TGA8000 stage table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StageRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Unsubtracted weight")]
    pub unsubtracted_weight: f64,
    #[serde(rename = "Baseline weight")]
    pub baseline_weight: f64,
    #[serde(rename = "Program Temp.")]
    pub program_temp: f64,
    #[serde(rename = "Sample Temp.")]
    pub sample_temp: f64,
    #[serde(rename = "Sample Purge Flow")]
    pub sample_purge_flow: f64,
    #[serde(rename = "Balance purge flow")]
    pub balance_purge_flow: f64,
}

/// Column store for one TGA stage. The derived columns are filled by `calc_dtga`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stage {
    pub time: Vec<f64>,
    pub unsubtracted_weight: Vec<f64>,
    pub baseline_weight: Vec<f64>,
    pub program_temp: Vec<f64>,
    pub sample_temp: Vec<f64>,
    pub sample_purge_flow: Vec<f64>,
    pub balance_purge_flow: Vec<f64>,
    pub rel_weight_twl: Option<Vec<f64>>,
    pub rel_weight_pwl: Option<Vec<f64>>,
    pub dtga_twl: Option<Vec<f64>>,
    pub dtga_pwl: Option<Vec<f64>>,
}

impl Stage {
    pub fn from_rows(rows: &[StageRow]) -> Self {
        let mut s = Stage::default();
        for r in rows {
            s.push(*r);
        }
        s
    }

    pub fn push(&mut self, r: StageRow) {
        self.time.push(r.time);
        self.unsubtracted_weight.push(r.unsubtracted_weight);
        self.baseline_weight.push(r.baseline_weight);
        self.program_temp.push(r.program_temp);
        self.sample_temp.push(r.sample_temp);
        self.sample_purge_flow.push(r.sample_purge_flow);
        self.balance_purge_flow.push(r.balance_purge_flow);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Keeps the rows where `keep[i]` is true. Derived columns are dropped.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        fn filter(v: &mut Vec<f64>, keep: &[bool]) {
            let mut i = 0usize;
            v.retain(|_| {
                let k = keep.get(i).copied().unwrap_or(false);
                i += 1;
                k
            });
        }
        filter(&mut self.time, keep);
        filter(&mut self.unsubtracted_weight, keep);
        filter(&mut self.baseline_weight, keep);
        filter(&mut self.program_temp, keep);
        filter(&mut self.sample_temp, keep);
        filter(&mut self.sample_purge_flow, keep);
        filter(&mut self.balance_purge_flow, keep);
        self.rel_weight_twl = None;
        self.rel_weight_pwl = None;
        self.dtga_twl = None;
        self.dtga_pwl = None;
    }

    pub fn min_weight(&self) -> Result<f64> {
        finite_min(&self.unsubtracted_weight).ok_or(LabError::EmptyInput("stage weights"))
    }

    pub fn max_weight(&self) -> Result<f64> {
        finite_max(&self.unsubtracted_weight).ok_or(LabError::EmptyInput("stage weights"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentKind {
    /// Any multi-stage method, no cracking/burnoff semantics.
    General,
    /// Ramped plastic cracking under N2 followed by burnoff under O2.
    Pyro,
    /// Isothermal plastic cracking.
    PyroIso,
}

impl ExperimentKind {
    pub fn layout(&self) -> Option<StageLayout> {
        match self {
            ExperimentKind::General => None,
            ExperimentKind::Pyro => Some(StageLayout::new("stage4", "stage8")),
            ExperimentKind::PyroIso => Some(StageLayout::new("stage5", "stage7")),
        }
    }
}

impl FromStr for ExperimentKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "general" => Ok(ExperimentKind::General),
            "pyro" => Ok(ExperimentKind::Pyro),
            "pyro_iso" => Ok(ExperimentKind::PyroIso),
            other => Err(LabError::invalid(format!(
                "type must be 'general', 'pyro' or 'pyro_iso', found '{other}'"
            ))),
        }
    }
}

/// Which stages of the method hold the cracking and burnoff ramps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLayout {
    pub cracking: String,
    pub burnoff: String,
}

impl StageLayout {
    pub fn new(cracking: &str, burnoff: &str) -> Self {
        Self {
            cracking: cracking.to_string(),
            burnoff: burnoff.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageSelect {
    Cracking,
    Burnoff,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TgaExperiment {
    pub kind: ExperimentKind,
    pub layout: Option<StageLayout>,
    stages: Vec<(String, Stage)>,
}

impl TgaExperiment {
    pub fn new(kind: ExperimentKind) -> Self {
        Self {
            kind,
            layout: kind.layout(),
            stages: Vec::new(),
        }
    }

    /// Overrides the cracking/burnoff stages, e.g. for a modified TGA method.
    pub fn with_layout(mut self, layout: StageLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn from_stage_files<P: AsRef<Path>>(
        kind: ExperimentKind,
        stage_files: &[(&str, P)],
    ) -> Result<Self> {
        let mut exp = TgaExperiment::new(kind);
        for (name, path) in stage_files {
            let stage = parse_stage_csv(path.as_ref())?;
            exp.add_stage(name, stage);
        }
        Ok(exp)
    }

    /// Adds or replaces a stage.
    pub fn add_stage(&mut self, name: &str, stage: Stage) {
        debug!(stage = name, rows = stage.len(), "add stage");
        match self.stages.iter().position(|(n, _)| n == name) {
            Some(i) => self.stages[i].1 = stage,
            None => self.stages.push((name.to_string(), stage)),
        }
    }

    pub fn get_stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn get_stage_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn stage_name(&self, which: StageSelect) -> Result<&str> {
        let layout = self.layout.as_ref().ok_or(LabError::NoStageLayout)?;
        Ok(match which {
            StageSelect::Cracking => layout.cracking.as_str(),
            StageSelect::Burnoff => layout.burnoff.as_str(),
        })
    }

    pub fn select(&self, which: StageSelect) -> Result<&Stage> {
        let name = self.stage_name(which)?;
        self.get_stage(name)
            .ok_or_else(|| LabError::MissingStage(name.to_string()))
    }

    pub fn cracking(&self) -> Result<&Stage> {
        self.select(StageSelect::Cracking)
    }

    pub fn burnoff(&self) -> Result<&Stage> {
        self.select(StageSelect::Burnoff)
    }

    /// Catalyst mass: what is left after burnoff.
    pub fn m_cat(&self) -> Result<f64> {
        self.burnoff()?.min_weight()
    }

    pub fn m_poly(&self) -> Result<f64> {
        Ok(self.cracking()?.max_weight()? - self.m_cat()?)
    }

    pub fn m_coke(&self) -> Result<f64> {
        Ok(self.cracking()?.min_weight()? - self.m_cat()?)
    }

    pub fn pct_loss(&self) -> Result<f64> {
        let (p, c) = (self.m_poly()?, self.m_cat()?);
        Ok(p / (p + c))
    }

    pub fn p_c_ratio(&self) -> Result<f64> {
        Ok(self.m_poly()? / self.m_cat()?)
    }

    pub fn coke_yield(&self) -> Result<f64> {
        Ok(self.m_coke()? / self.m_poly()?)
    }

    /// Isothermal cracking temperature, rounded to whole degrees.
    pub fn temp(&self) -> Result<f64> {
        let stage = self.cracking()?;
        stage
            .sample_temp
            .last()
            .map(|t| t.round())
            .ok_or(LabError::EmptyInput("cracking stage"))
    }
}
