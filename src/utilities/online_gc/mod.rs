pub mod baseline_correct;
pub use baseline_correct::{BaselineWindows, baseline_correct};

pub mod integrate_peaks;
pub use integrate_peaks::{PeakTable, PeakWindow, integrate_peaks, integrate_window, peak_names};

pub mod process_chromatograms;
pub use process_chromatograms::{
    InjectionIntegrals, IntegralTable, chromatogram_paths, plateau_mean, process_chromatograms,
};
