use std::path::Path;

use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    parse::helper::{parse_f64, read_text},
    structs::Chromatogram1D,
};

const TIME_MIN_COLUMN: usize = 1;
const INTENSITY_COLUMN: usize = 3;

/// Reads an FID export: one leading line, a header line, then
/// `Time(ms),Time(min),unknown,Absolute Intensity` rows.
pub fn parse_gcxgc(path: &Path) -> Result<Chromatogram1D> {
    let text = read_text(path)?;
    parse_gcxgc_str(&text)
}

pub fn parse_gcxgc_str(text: &str) -> Result<Chromatogram1D> {
    let body = match text.split_once('\n') {
        Some((_, rest)) => rest,
        None => return Err(LabError::EmptyInput("GCxGC export")),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut minutes = Vec::new();
    let mut intensity = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        // the leading line was cut off before the reader saw the text
        let line = rec.position().map_or(0, |p| p.line() as usize + 1);
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        if rec.len() <= INTENSITY_COLUMN {
            return Err(LabError::parse(
                line,
                format!("expected 4 columns, found {}", rec.len()),
            ));
        }
        minutes.push(parse_f64(&rec[TIME_MIN_COLUMN], line, "Time(min)")?);
        intensity.push(parse_f64(&rec[INTENSITY_COLUMN], line, "Absolute Intensity")?);
    }
    if minutes.is_empty() {
        return Err(LabError::EmptyInput("GCxGC export"));
    }

    let t0 = minutes[0];
    let time = minutes.iter().map(|m| (m - t0) * 60.0).collect();
    debug!(points = intensity.len(), "parsed GCxGC trace");
    Ok(Chromatogram1D { time, intensity })
}
