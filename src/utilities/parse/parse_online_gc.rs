use std::path::Path;

use tracing::debug;

use crate::utilities::{
    errors::{LabError, Result},
    parse::helper::{meta_values, parse_f64, read_text},
    structs::OnlineChromatogram,
};

pub const META_LINES: usize = 13;
const INJECTION_LINE: usize = 6;
const SAMPLING_LINE: usize = 7;

pub fn parse_online_gc(path: &Path) -> Result<OnlineChromatogram> {
    let text = read_text(path)?;
    parse_online_gc_str(&text)
}

/// Reads an online GC ASCII export. The 13 metadata lines are followed by the
/// FID_L, FID_M and TCD traces written one after the other, one value per line.
pub fn parse_online_gc_str(text: &str) -> Result<OnlineChromatogram> {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    if lines.len() <= META_LINES {
        return Err(LabError::EmptyInput("online GC export"));
    }

    let metadata: Vec<String> = lines[..META_LINES].iter().map(|l| l.to_string()).collect();
    let first_cell = |i: usize| lines[i].split('\t').next().unwrap_or("");

    let freq_cells = meta_values(first_cell(SAMPLING_LINE));
    if freq_cells.len() < 3 {
        return Err(LabError::parse(
            SAMPLING_LINE + 1,
            "expected three sampling frequencies",
        ));
    }
    let mut freqs = Vec::with_capacity(3);
    for cell in &freq_cells[..3] {
        freqs.push(parse_f64(cell, SAMPLING_LINE + 1, "sampling frequency")?);
    }
    if freqs.iter().any(|f| *f != freqs[0]) {
        return Err(LabError::SamplingMismatch(freqs));
    }
    let frequency = freqs[0];
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(LabError::parse(
            SAMPLING_LINE + 1,
            format!("sampling frequency must be positive, found {frequency}"),
        ));
    }

    let injection_time = meta_values(first_cell(INJECTION_LINE))
        .first()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let mut trace = Vec::with_capacity(lines.len() - META_LINES);
    for (i, line) in lines.iter().enumerate().skip(META_LINES) {
        let cell = line.split('\t').next().unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        trace.push(parse_f64(cell, i + 1, "signal")?);
    }

    let n = trace.len();
    let (a, b) = (n / 3, 2 * n / 3);
    let len = a.min(b - a).min(n - b);
    if len == 0 {
        return Err(LabError::EmptyInput("online GC channels"));
    }
    if a != b - a || a != n - b {
        debug!(points = n, kept = len, "channel lengths differ, truncating");
    }

    let fid_l = trace[..len].to_vec();
    let fid_m = trace[a..a + len].to_vec();
    let tcd = trace[b..b + len].to_vec();
    let time = (0..len).map(|i| i as f64 / frequency).collect();

    debug!(points = len, frequency, "parsed online GC injection");
    Ok(OnlineChromatogram {
        time,
        fid_l,
        fid_m,
        tcd,
        sampling_frequency: frequency,
        injection_time,
        metadata,
    })
}
