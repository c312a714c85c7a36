use serde::{Deserialize, Serialize};

use crate::utilities::{
    errors::{LabError, Result},
    structs::{Channel, FromTo, OnlineChromatogram},
    utilities::mean,
};

/// Flat regions (seconds) whose mean is taken as the baseline of each channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineWindows {
    pub fid: FromTo,
    pub tcd: FromTo,
}

impl Default for BaselineWindows {
    fn default() -> Self {
        Self {
            fid: FromTo {
                from: 288.0,
                to: 294.0,
            },
            tcd: FromTo {
                from: 10.0,
                to: 15.0,
            },
        }
    }
}

impl BaselineWindows {
    pub fn for_channel(&self, ch: Channel) -> FromTo {
        match ch {
            Channel::FidL | Channel::FidM => self.fid,
            Channel::Tcd => self.tcd,
        }
    }
}

fn window_rows(w: FromTo, frequency: f64, len: usize) -> Result<(usize, usize)> {
    let start = (w.from * frequency).round();
    let end = (w.to * frequency).round();
    if !(start >= 0.0 && end > start && end <= len as f64) {
        return Err(LabError::invalid(format!(
            "baseline window {}-{} s lies outside the {:.1} s trace",
            w.from,
            w.to,
            len as f64 / frequency
        )));
    }
    Ok((start as usize, end as usize))
}

/// Subtracts from each channel the mean of its flat baseline window.
pub fn baseline_correct(
    mut chrom: OnlineChromatogram,
    windows: BaselineWindows,
) -> Result<OnlineChromatogram> {
    let f = chrom.sampling_frequency;
    let len = chrom.len();
    for ch in [Channel::FidL, Channel::FidM, Channel::Tcd] {
        let (a, b) = window_rows(windows.for_channel(ch), f, len)?;
        let values = chrom.channel_mut(ch);
        let base = mean(&values[a..b]);
        for v in values.iter_mut() {
            *v -= base;
        }
    }
    Ok(chrom)
}
