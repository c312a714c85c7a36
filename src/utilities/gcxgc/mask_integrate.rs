use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utilities::{
    errors::{LabError, Result},
    gcxgc::correct_2d::volume,
    structs::Chromatogram2D,
};

const MASK_PREFIX: &str = "Mask_";

/// Region of interest with per-pixel weights in `[0, 1]`, same shape as the
/// 2-D chromatogram it is applied to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mask {
    pub name: String,
    pub weights: Array2<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionIntegral {
    pub name: String,
    pub integral: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskIntegrals {
    pub regions: Vec<RegionIntegral>,
    /// Volume not covered by any mask.
    pub unassigned: f64,
}

impl MaskIntegrals {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.integral)
    }
}

/// `Mask_Monoaromatics.tif` → `Monoaromatics`. The name ends at the first dot.
pub fn mask_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file.split('.').next().unwrap_or("");
    stem.rsplit(MASK_PREFIX).next().unwrap_or("").to_string()
}

/// Loads a TIFF mask. Pixel values are scaled by 1/255.
pub fn load_mask(path: &Path) -> Result<Mask> {
    let img = image::open(path)?.to_luma8();
    let (w, h) = img.dimensions();
    let weights = Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
        img.get_pixel(c as u32, r as u32).0[0] as f64 / 255.0
    });
    let name = mask_name(path);
    debug!(mask = %name, rows = h, cols = w, "loaded mask");
    Ok(Mask { name, weights })
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| e == "tif" || e == "tiff")
}

/// Loads every `.tif`/`.tiff` in `dir`, ordered by file name.
pub fn load_masks(dir: &Path) -> Result<Vec<Mask>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_tiff(p))
        .collect();
    paths.sort();
    if paths.is_empty() {
        warn!(dir = %dir.display(), "no mask images found");
    }
    paths.iter().map(|p| load_mask(p)).collect()
}

pub fn integrate_masked(c2d: &Chromatogram2D, mask: &Mask) -> Result<f64> {
    if c2d.intensity.dim() != mask.weights.dim() {
        return Err(LabError::ShapeMismatch {
            expected: c2d.intensity.dim(),
            found: mask.weights.dim(),
        });
    }
    let masked = &c2d.intensity * &mask.weights;
    Ok(volume(&masked))
}

/// Integrates every mask over a normalized chromatogram. Whatever is left of the
/// unit volume is reported as unassigned.
pub fn mask_integrate(c2d: &Chromatogram2D, masks: &[Mask]) -> Result<MaskIntegrals> {
    let mut regions = Vec::with_capacity(masks.len());
    for m in masks {
        let integral = integrate_masked(c2d, m)?;
        regions.push(RegionIntegral {
            name: m.name.clone(),
            integral,
        });
    }
    let assigned: f64 = regions.iter().map(|r| r.integral).sum();
    Ok(MaskIntegrals {
        regions,
        unassigned: 1.0 - assigned,
    })
}
