//! Error types for the report engine
//!
//! Per-image faults are reported with `ImageLoad`/`ImageEncode` and are
//! normally contained by the renderer. The remaining variants describe
//! whole-document failures that end a generation.

use thiserror::Error;

/// Custom error type for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to load image '{locator}': {reason}")]
    ImageLoad { locator: String, reason: String },

    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("PDF is {size} bytes, over the {ceiling} byte ceiling even at quality {quality}")]
    SizeCeilingExceeded { size: usize, ceiling: usize, quality: u8 },

    #[error("Failed to write report '{path}': {reason}")]
    OutputWrite { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn image_load(locator: &str, reason: impl ToString) -> Self {
        ReportError::ImageLoad {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for engine operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(feature = "python")]
impl From<ReportError> for pyo3::PyErr {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io(_) | ReportError::OutputWrite { .. } => {
                pyo3::PyErr::new::<pyo3::exceptions::PyIOError, _>(err.to_string())
            }
            _ => pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string()),
        }
    }
}
