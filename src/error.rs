//! Error types for trace extraction and log resampling

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for welltrace operations
#[derive(Error, Debug)]
pub enum WellTraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid SEG-Y format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported sample format code: {0}")]
    UnsupportedSampleFormat(i16),

    #[error("Volume identifier '{identifier}' of {} is already taken", path.display())]
    DuplicateIdentifier { identifier: String, path: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WellTraceError {
    /// Attach a file path to a decoding error
    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        WellTraceError::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Specialized Result type for welltrace operations
pub type Result<T> = std::result::Result<T, WellTraceError>;

impl From<csv::Error> for WellTraceError {
    fn from(err: csv::Error) -> Self {
        WellTraceError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for WellTraceError {
    fn from(err: serde_json::Error) -> Self {
        WellTraceError::Serialization(err.to_string())
    }
}
