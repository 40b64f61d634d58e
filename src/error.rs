//! Error types for the grounder-output conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion errors. Every variant is terminal for the problem instance being converted.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing section, index out of range, odd ordering line, unparsable token, or a synthetic
    /// action with no group mapping.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// One abstract task is decomposed by synthetic methods naming two different outcome counts.
    #[error("Ambiguous outcome grouping for task '{task}': methods name both {first} and {second} outcomes")]
    AmbiguousGrouping {
        task: String,
        first: usize,
        second: usize,
    },

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
