use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the analysis pipeline.
///
/// "No bins in a band" and "no blast found" are regular outcomes and never
/// show up here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid input to {stage}: {reason}")]
    InvalidInput { stage: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("window {index}: {source}")]
    Window {
        index: usize,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    pub fn invalid_input(stage: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration(reason.into())
    }

    /// Attach the index of the window being processed when the error occurred.
    pub fn in_window(self, index: usize) -> Self {
        AnalysisError::Window {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
