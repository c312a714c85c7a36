pub mod tga_exp;
pub use tga_exp::{ExperimentKind, Stage, StageLayout, StageRow, StageSelect, TgaExperiment};

pub mod calc_dtga;
pub use calc_dtga::{
    DtgaOptions, Smoothing, TgaSummary, calc_dtga, calc_t50, calc_tmax, load_tga, summarize,
};

pub mod water_content;
pub use water_content::{water_content, water_content_str};
