//! Error taxonomy for the fixup engine.
//!
//! `FixupError` aborts a run before any file is touched. `LoadError` and
//! `RewriteError` are per-file and never escape the batch runner.

use crate::types::FailureCategory;
use std::path::PathBuf;

/// Fatal, start-up errors.
#[derive(thiserror::Error, Debug)]
pub enum FixupError {
    #[error("Markup backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("No such directory: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("Failed to list {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Classified failure to turn one file into a document.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Malformed markup at byte {position}: {message}")]
    MalformedMarkup { position: usize, message: String },
}

impl LoadError {
    pub fn category(&self) -> FailureCategory {
        match self {
            LoadError::Io(_) => FailureCategory::Io,
            LoadError::Encoding(_) => FailureCategory::Encoding,
            LoadError::MalformedMarkup { .. } => FailureCategory::MalformedMarkup,
        }
    }
}

/// Failure to persist a rewritten document.
#[derive(thiserror::Error, Debug)]
pub enum RewriteError {
    #[error("Failed to write temporary file {}: {source}", .path.display())]
    TempWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to replace {}: {source}", .path.display())]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path has no parent directory: {}", .0.display())]
    NoParent(PathBuf),
}

impl RewriteError {
    pub fn category(&self) -> FailureCategory {
        FailureCategory::Write
    }
}

/// Convenience result type for fatal errors.
pub type FixupResult<T> = Result<T, FixupError>;
