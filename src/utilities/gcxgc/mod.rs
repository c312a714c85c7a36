pub mod convert_to_2d;
pub use convert_to_2d::{convert_to_2d, min_correct, modulate, points_per_modulation, split_solvent};

pub mod correct_2d;
pub use correct_2d::{baseline_stridewise, normalize_array, shift_phase, volume};

pub mod mask_integrate;
pub use mask_integrate::{
    Mask, MaskIntegrals, RegionIntegral, integrate_masked, load_mask, load_masks, mask_integrate,
    mask_name,
};

pub mod process_chromatogram;
pub use process_chromatogram::{GcxGcOptions, prepare_2d, process_chromatogram, process_trace};
