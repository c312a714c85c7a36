use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utilities::{
    errors::{LabError, Result},
    gcxgc::GcxGcOptions,
    ir::TpdOptions,
    online_gc::{BaselineWindows, PeakTable},
    simulation::SimulationOptions,
    tga::{DtgaOptions, ExperimentKind},
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineGcConfig {
    pub baseline: BaselineWindows,
    pub peaks: PeakTable,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TgaConfig {
    pub kind: ExperimentKind,
    pub dtga: DtgaOptions,
}

impl Default for TgaConfig {
    fn default() -> Self {
        Self {
            kind: ExperimentKind::Pyro,
            dtga: DtgaOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IrConfig {
    pub pellet_weight: f64,
    pub tpd: TpdOptions,
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            pellet_weight: 1.0,
            tpd: TpdOptions::default(),
        }
    }
}

/// Options of every pipeline, read from one TOML file. Missing sections and
/// keys keep their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub gcxgc: GcxGcOptions,
    pub online_gc: OnlineGcConfig,
    pub tga: TgaConfig,
    pub ir: IrConfig,
    pub simulation: SimulationOptions,
}

impl LabConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: LabConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gcxgc.split_time > 0.0 && self.gcxgc.sampling_interval > 0.0) {
            return Err(LabError::invalid(
                "gcxgc split_time and sampling_interval must be positive",
            ));
        }
        if self.tga.dtga.averaging_window == 0 {
            return Err(LabError::invalid("tga averaging_window must be positive"));
        }
        if !(self.ir.pellet_weight > 0.0) {
            return Err(LabError::invalid("ir pellet_weight must be positive"));
        }
        for (_, p) in self.online_gc.peaks.iter() {
            if p.to <= p.from {
                return Err(LabError::invalid(format!(
                    "peak '{}' window is empty ({}..{})",
                    p.name, p.from, p.to
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = LabConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.gcxgc.split_time, 20.0);
        assert_eq!(cfg.gcxgc.sampling_interval, 20.0);
        assert_eq!(cfg.gcxgc.shift, 0);
        assert_eq!(cfg.gcxgc.solvent_time, 0.0);
        assert_eq!(cfg.tga.dtga.averaging_window, 30);
        assert_eq!(cfg.ir.tpd.fit.peak_loc, 1545.0);
    }

    #[test]
    fn rejects_inverted_peak_window() {
        let text = r#"
[[online_gc.peaks.tcd]]
name = "H2"
from = 40.0
to = 30.0
"#;
        assert!(matches!(
            LabConfig::from_toml_str(text),
            Err(LabError::InvalidOptions(_))
        ));
    }
}
