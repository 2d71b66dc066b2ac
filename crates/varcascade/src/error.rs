//! Error type for whole-stylesheet runs.

/// Result type alias for varcascade runs.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from any stage of a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or building a stylesheet failed.
    #[error(transparent)]
    Stylesheet(#[from] varcascade_core::Error),

    /// Resolution was aborted.
    #[error(transparent)]
    Resolve(#[from] varcascade_resolve::ResolveError),

    /// Scanning sources or writing the report failed.
    #[error(transparent)]
    Report(#[from] varcascade_report::ReportError),

    /// Invalid command-line usage.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
