//! Error types for guide conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our run-level Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole run.
///
/// Per-file problems never show up here; they are reported as
/// [`ConversionError`] and the batch carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to create, list or write a directory or file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the guide list.
    #[error("Failed to serialize guide list: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while converting a single presentation.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The office application is not installed or could not be started.
    #[error("Office application unavailable: {0}")]
    Unavailable(String),

    /// The source file disappeared before conversion.
    #[error("Input file not found at {}", .0.display())]
    MissingInput(PathBuf),

    /// The application could not open the presentation.
    #[error("Failed to open presentation: {0}")]
    Open(String),

    /// The application could not export the presentation as PDF.
    #[error("Failed to export PDF: {0}")]
    Export(String),

    /// Closing the document or quitting the application failed.
    #[error("Cleanup failed: {0}")]
    Cleanup(String),
}

impl ConversionError {
    /// Whether this failure means the office application itself is missing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
