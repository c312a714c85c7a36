use std::fs;
use std::path::Path;

use tracing::debug;

use crate::utilities::errors::{LabError, Result};

pub fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read export");
    Ok(text)
}

/// Parses one numeric field. `line` is 1-based and only used for the error.
#[inline]
pub fn parse_f64(field: &str, line: usize, column: &str) -> Result<f64> {
    let t = field.trim();
    t.parse::<f64>()
        .map_err(|_| LabError::parse(line, format!("{column}: cannot read '{t}' as a number")))
}

/// Like `parse_f64` but tolerant: empty or non-numeric fields become `None`.
#[inline]
pub fn try_f64(field: &str) -> Option<f64> {
    let t = field.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}

/// Splits `label,v1,v2,...` metadata cells and returns the values after the label.
pub fn meta_values(cell: &str) -> Vec<&str> {
    cell.split(',').skip(1).map(str::trim).collect()
}
