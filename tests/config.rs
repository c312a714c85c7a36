use labut::utilities::config::LabConfig;
use labut::utilities::errors::LabError;
use labut::utilities::ir::PeakModel;
use labut::utilities::simulation::ScissionModel;
use labut::utilities::tga::{ExperimentKind, Smoothing};
use std::io::Write;

const SAMPLE: &str = r#"
[gcxgc]
split_time = 6.0
sampling_interval = 5.0
shift = -3

[online_gc.baseline.fid]
from = 280.0
to = 290.0

[[online_gc.peaks.fid_m]]
name = "CH4"
from = 40.0
to = 48.0

[[online_gc.peaks.tcd]]
name = "H2"
from = 20.0
to = 25.0

[tga]
kind = "pyro_iso"

[tga.dtga]
averaging_window = 21
smoothing = "savitzky_golay"

[ir]
pellet_weight = 12.5

[ir.tpd.fit]
model = "gaussian"

[simulation]
steps = 100

[simulation.model]
kind = "end_chain"
decay = 0.5
"#;

// sections override only the keys they name
#[test]
fn reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let cfg = LabConfig::from_path(file.path()).unwrap();
    assert_eq!(cfg.gcxgc.split_time, 6.0);
    assert_eq!(cfg.gcxgc.shift, -3);
    assert_eq!(cfg.gcxgc.solvent_time, 0.0);

    assert_eq!(cfg.online_gc.baseline.fid.from, 280.0);
    assert_eq!(cfg.online_gc.baseline.tcd.from, 10.0);
    assert_eq!(cfg.online_gc.peaks.len(), 2);
    assert_eq!(cfg.online_gc.peaks.fid_m[0].name, "CH4");

    assert_eq!(cfg.tga.kind, ExperimentKind::PyroIso);
    assert_eq!(cfg.tga.dtga.averaging_window, 21);
    assert_eq!(cfg.tga.dtga.smoothing, Smoothing::SavitzkyGolay);

    assert_eq!(cfg.ir.pellet_weight, 12.5);
    assert_eq!(cfg.ir.tpd.fit.model, PeakModel::Gaussian);
    assert_eq!(cfg.ir.tpd.fit.peak_loc, 1545.0);

    assert_eq!(cfg.simulation.steps, 100);
    assert_eq!(cfg.simulation.model, ScissionModel::EndChain { decay: 0.5 });
}

#[test]
fn malformed_toml_is_a_config_error() {
    assert!(matches!(
        LabConfig::from_toml_str("[gcxgc\nsplit_time = 1"),
        Err(LabError::Config(_))
    ));
}

#[test]
fn non_positive_pellet_weight_is_rejected() {
    assert!(matches!(
        LabConfig::from_toml_str("[ir]\npellet_weight = 0.0\n"),
        Err(LabError::InvalidOptions(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        LabConfig::from_path(&dir.path().join("nope.toml")),
        Err(LabError::Io(_))
    ));
}
