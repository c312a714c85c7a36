use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utilities::{
    errors::Result,
    gcxgc::{
        convert_to_2d::{convert_to_2d, split_solvent},
        correct_2d::{baseline_stridewise, normalize_array, shift_phase},
        mask_integrate::{Mask, MaskIntegrals, load_masks, mask_integrate},
    },
    parse::parse_gcxgc::parse_gcxgc,
    structs::{Chromatogram1D, Chromatogram2D},
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GcxGcOptions {
    /// Modulation period in seconds.
    pub split_time: f64,
    /// Detector sampling interval in milliseconds.
    pub sampling_interval: f64,
    /// Phase shift in rows.
    pub shift: isize,
    /// Everything up to this retention time (s) is zeroed.
    pub solvent_time: f64,
}

impl Default for GcxGcOptions {
    fn default() -> Self {
        Self {
            split_time: 20.0,
            sampling_interval: 20.0,
            shift: 0,
            solvent_time: 0.0,
        }
    }
}

/// Solvent cut, folding, per-modulation baseline, phase shift and unit-volume
/// normalization.
pub fn prepare_2d(chrom: Chromatogram1D, options: GcxGcOptions) -> Result<Chromatogram2D> {
    let chrom = split_solvent(chrom, options.solvent_time);
    let c2d = convert_to_2d(&chrom, options.split_time, options.sampling_interval)?;
    let c2d = baseline_stridewise(c2d);
    let c2d = shift_phase(c2d, options.shift);
    normalize_array(c2d)
}

pub fn process_trace(
    chrom: Chromatogram1D,
    options: GcxGcOptions,
    masks: &[Mask],
) -> Result<(MaskIntegrals, Chromatogram2D)> {
    let c2d = prepare_2d(chrom, options)?;
    let integrals = mask_integrate(&c2d, masks)?;
    Ok((integrals, c2d))
}

pub fn process_chromatogram(
    path: &Path,
    options: GcxGcOptions,
    mask_dir: &Path,
) -> Result<(MaskIntegrals, Chromatogram2D)> {
    let chrom = parse_gcxgc(path)?;
    let masks = load_masks(mask_dir)?;
    let (integrals, c2d) = process_trace(chrom, options, &masks)?;
    info!(
        file = %path.display(),
        regions = integrals.regions.len(),
        unassigned = integrals.unassigned,
        "integrated GCxGC chromatogram"
    );
    Ok((integrals, c2d))
}
