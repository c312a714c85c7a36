pub mod spectra;
pub use spectra::{SpectraSeries, Spectrum};

pub mod models;
pub use models::{PeakModel, gaussian, lorentzian};

pub mod lm;
pub use lm::{LmOptions, LmResult, lm, lm_bounded};

pub mod fit_integrate_peak;
pub use fit_integrate_peak::{FitOptions, PeakFit, fit_integrate_peak};

pub mod baseline;
pub use baseline::{baseline_subtract, get_slice, linear_baseline, linear_bl_corr};

pub mod absorbance;
pub use absorbance::{add_temperatures, assign_temperatures, to_absorbance};

pub mod split_experiment;
pub use split_experiment::{ExperimentIndices, SplitExperiment, find_indices, split_experiment};

pub mod tpd;
pub use tpd::{TpdOptions, TpdPoint, cut_tpd_dataset, get_tpd_bas};
