use std::path::Path;

use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    parse::{helper::read_text, parse_tga::parse_single_table},
    utilities::{finite_max, finite_min},
};

const HEADER_LINES: usize = 38;
const FOOTER_LINES: usize = 45;
const CUTOFF_TEMP: f64 = 800.0;

pub fn water_content(path: &Path) -> Result<f64> {
    let text = read_text(path)?;
    water_content_str(&text)
}

/// Relative weight loss `(max - min) / max` of a drying run, up to the first
/// sample temperature of 800 °C.
pub fn water_content_str(text: &str) -> Result<f64> {
    let table = parse_single_table(text, HEADER_LINES, FOOTER_LINES)?;
    let end = table
        .sample_temp
        .iter()
        .position(|t| *t >= CUTOFF_TEMP)
        .unwrap_or(table.len());
    if end < table.len() {
        debug!(rows = end, "cut TGA table at 800 °C");
    }
    let w = &table.unsubtracted_weight[..end];
    let max = finite_max(w).ok_or(LabError::EmptyInput("TGA weights below 800 °C"))?;
    let min = finite_min(w).ok_or(LabError::EmptyInput("TGA weights below 800 °C"))?;
    Ok((max - min) / max)
}
