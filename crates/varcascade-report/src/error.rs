//! Error types for usage reporting.

use std::path::PathBuf;

/// Result type alias for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while scanning sources or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// File I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid TOML configuration.
    #[error("Invalid report configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Invalid declaration pattern.
    #[error("Invalid declaration pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ReportError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
