use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::utilities::{
    errors::{LabError, Result},
    parse::helper::{read_text, try_f64},
    tga::tga_exp::{ExperimentKind, Stage, StageRow, TgaExperiment},
};

const STAGE_MARKER: &str = r"(\d+)\) TGA";
// rest of the marker line and the column header
const SECTION_SKIP_LINES: usize = 2;
const COLUMNS: usize = 8;

pub fn parse_tga(path: &Path, kind: ExperimentKind) -> Result<TgaExperiment> {
    let text = read_text(path)?;
    parse_tga_str(&text, kind)
}

/// Splits a PerkinElmer TGA8000 ASCII export into its numbered stages. Every
/// `N) TGA` marker opens `stageN`.
pub fn parse_tga_str(text: &str, kind: ExperimentKind) -> Result<TgaExperiment> {
    let re = Regex::new(STAGE_MARKER).map_err(|e| LabError::invalid(e.to_string()))?;

    let mut marks: Vec<(u32, usize, usize)> = Vec::new();
    for cap in re.captures_iter(text) {
        let (Some(all), Some(num)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let line = text[..all.start()].lines().count() + 1;
        let n = num
            .as_str()
            .parse::<u32>()
            .map_err(|_| LabError::parse(line, format!("bad stage number '{}'", num.as_str())))?;
        marks.push((n, all.start(), all.end()));
    }
    if marks.is_empty() {
        return Err(LabError::parse(1, "no 'N) TGA' stage marker found"));
    }

    let mut exp = TgaExperiment::new(kind);
    for (k, &(n, _, end)) in marks.iter().enumerate() {
        let stop = marks.get(k + 1).map_or(text.len(), |m| m.1);
        let stage = read_section(&text[end..stop]);
        exp.add_stage(&format!("stage{n}"), stage);
    }
    debug!(stages = ?exp.stage_names(), "parsed TGA export");
    Ok(exp)
}

fn read_section(section: &str) -> Stage {
    let mut stage = Stage::default();
    let mut skipped = 0usize;
    for line in section.lines().skip(SECTION_SKIP_LINES) {
        match parse_row(line) {
            Some(r) => stage.push(r),
            None => {
                if !line.trim().is_empty() {
                    skipped += 1;
                }
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, "skipped non-numeric TGA rows");
    }
    stage
}

// Blank, Time, Unsubtracted weight, Baseline weight, Program Temp.,
// Sample Temp., Sample Purge Flow, Balance purge flow
fn parse_row(line: &str) -> Option<StageRow> {
    let f: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
    if f.len() < COLUMNS {
        return None;
    }
    Some(StageRow {
        time: try_f64(f[1])?,
        unsubtracted_weight: try_f64(f[2])?,
        baseline_weight: try_f64(f[3])?,
        program_temp: try_f64(f[4])?,
        sample_temp: try_f64(f[5])?,
        sample_purge_flow: try_f64(f[6])?,
        balance_purge_flow: try_f64(f[7])?,
    })
}

/// Reads a stage table written as CSV with the TGA column names as header.
pub fn parse_stage_csv(path: &Path) -> Result<Stage> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let mut stage = Stage::default();
    for row in rdr.deserialize::<StageRow>() {
        stage.push(row?);
    }
    if stage.is_empty() {
        warn!(path = %path.display(), "stage file has no rows");
    }
    Ok(stage)
}

/// A single table in the stage row layout, wrapped in `header` leading and
/// `footer` trailing lines.
pub(crate) fn parse_single_table(text: &str, header: usize, footer: usize) -> Result<Stage> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= header + footer {
        return Err(LabError::EmptyInput("TGA table"));
    }
    let mut stage = Stage::default();
    for (i, line) in lines[header..lines.len() - footer].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row(line)
            .ok_or_else(|| LabError::parse(header + i + 1, "expected 8 tab-separated columns"))?;
        stage.push(row);
    }
    Ok(stage)
}
