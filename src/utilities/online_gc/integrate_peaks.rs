use serde::{Deserialize, Serialize};

use crate::utilities::{
    structs::{Channel, FromTo, OnlineChromatogram},
    utilities::trapezoid,
};

/// Named retention window (seconds).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakWindow {
    pub name: String,
    pub from: f64,
    pub to: f64,
}

impl PeakWindow {
    pub fn new(name: &str, from: f64, to: f64) -> Self {
        Self {
            name: name.to_string(),
            from,
            to,
        }
    }
}

/// Peaks to integrate on each channel. Output order is FID_M, TCD, FID_L.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakTable {
    pub fid_m: Vec<PeakWindow>,
    pub tcd: Vec<PeakWindow>,
    pub fid_l: Vec<PeakWindow>,
}

impl PeakTable {
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &PeakWindow)> {
        self.fid_m
            .iter()
            .map(|p| (Channel::FidM, p))
            .chain(self.tcd.iter().map(|p| (Channel::Tcd, p)))
            .chain(self.fid_l.iter().map(|p| (Channel::FidL, p)))
    }

    pub fn len(&self) -> usize {
        self.fid_m.len() + self.tcd.len() + self.fid_l.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn peak_names(table: &PeakTable) -> Vec<String> {
    table.iter().map(|(_, p)| p.name.clone()).collect()
}

/// Area of one window, trapezoid in sample units over `from < t < to`.
pub fn integrate_window(time: &[f64], values: &[f64], window: FromTo) -> f64 {
    let inside: Vec<f64> = time
        .iter()
        .zip(values)
        .filter(|(t, _)| window.contains_open(**t))
        .map(|(_, v)| *v)
        .collect();
    trapezoid(&inside)
}

pub fn integrate_peaks(chrom: &OnlineChromatogram, table: &PeakTable) -> Vec<f64> {
    table
        .iter()
        .map(|(ch, p)| {
            integrate_window(
                &chrom.time,
                chrom.channel(ch),
                FromTo {
                    from: p.from,
                    to: p.to,
                },
            )
        })
        .collect()
}
