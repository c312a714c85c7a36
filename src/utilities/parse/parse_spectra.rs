use std::path::Path;

use ndarray::Array2;
use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    ir::spectra::SpectraSeries,
    parse::helper::{parse_f64, read_text, try_f64},
};

pub fn parse_spectra(path: &Path) -> Result<SpectraSeries> {
    let text = read_text(path)?;
    parse_spectra_str(&text)
}

/// Reads a spectra table: header `time,temperature,<wavenumbers...>`, then one
/// spectrum per row. An empty temperature cell is read as NaN.
pub fn parse_spectra_str(text: &str) -> Result<SpectraSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header = rdr.headers()?.clone();
    if header.len() < 3 {
        return Err(LabError::parse(
            1,
            "expected time, temperature and at least one wavenumber column",
        ));
    }
    let mut wavenumbers = Vec::with_capacity(header.len() - 2);
    for cell in header.iter().skip(2) {
        wavenumbers.push(parse_f64(cell, 1, "wavenumber")?);
    }
    let k = wavenumbers.len();

    let mut times = Vec::new();
    let mut temperatures = Vec::new();
    let mut flat = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map_or(0, |p| p.line() as usize);
        if rec.len() != k + 2 {
            return Err(LabError::parse(
                line,
                format!("expected {} columns, found {}", k + 2, rec.len()),
            ));
        }
        times.push(parse_f64(&rec[0], line, "time")?);
        temperatures.push(try_f64(&rec[1]).unwrap_or(f64::NAN));
        for cell in rec.iter().skip(2) {
            flat.push(parse_f64(cell, line, "absorbance")?);
        }
    }
    if times.is_empty() {
        return Err(LabError::EmptyInput("spectra table"));
    }

    let values = Array2::from_shape_vec((times.len(), k), flat)
        .map_err(|e| LabError::invalid(e.to_string()))?;
    debug!(spectra = times.len(), points = k, "parsed spectra");
    SpectraSeries::new(wavenumbers, times, temperatures, values)
}
