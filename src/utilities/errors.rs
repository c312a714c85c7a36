use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Sampling frequencies are not equal: {0:?}")]
    SamplingMismatch(Vec<f64>),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Stage '{0}' not found")]
    MissingStage(String),

    #[error("Experiment kind has no cracking/burnoff stage layout")]
    NoStageLayout,

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Chromatogram volume is zero or not finite")]
    ZeroVolume,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Fit failed: {0}")]
    Fit(String),
}

impl LabError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        LabError::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        LabError::InvalidOptions(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LabError>;
