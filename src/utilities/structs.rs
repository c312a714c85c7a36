use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DataXY {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FromTo {
    pub from: f64,
    pub to: f64,
}

impl FromTo {
    /// Open interval test, `from < v < to`.
    #[inline]
    pub fn contains_open(&self, v: f64) -> bool {
        v > self.from && v < self.to
    }
}

/// One-dimensional FID trace with retention times in seconds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Chromatogram1D {
    pub time: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl Chromatogram1D {
    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }
}

/// Folded GCxGC chromatogram.
///
/// Rows run over the second dimension (row 0 is the latest second-dimension
/// time), columns over modulations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chromatogram2D {
    pub intensity: Array2<f64>,
    /// Start of each modulation in seconds (first dimension).
    pub first_dim: Vec<f64>,
    /// Second-dimension time of each row in seconds.
    pub second_dim: Vec<f64>,
}

impl Chromatogram2D {
    pub fn shape(&self) -> (usize, usize) {
        self.intensity.dim()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    FidL,
    FidM,
    Tcd,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Channel::FidL => "FID_L",
            Channel::FidM => "FID_M",
            Channel::Tcd => "TCD",
        }
    }
}

/// Three-channel online GC injection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OnlineChromatogram {
    pub time: Vec<f64>,
    pub fid_l: Vec<f64>,
    pub fid_m: Vec<f64>,
    pub tcd: Vec<f64>,
    /// Sampling frequency in Hz, shared by all channels.
    pub sampling_frequency: f64,
    pub injection_time: Option<String>,
    pub metadata: Vec<String>,
}

impl OnlineChromatogram {
    pub fn channel(&self, ch: Channel) -> &[f64] {
        match ch {
            Channel::FidL => &self.fid_l,
            Channel::FidM => &self.fid_m,
            Channel::Tcd => &self.tcd,
        }
    }

    pub fn channel_mut(&mut self, ch: Channel) -> &mut Vec<f64> {
        match ch {
            Channel::FidL => &mut self.fid_l,
            Channel::FidM => &mut self.fid_m,
            Channel::Tcd => &mut self.tcd,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
