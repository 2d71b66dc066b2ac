//! Error types for the stylesheet tree.

use std::path::PathBuf;

use crate::tree::{DeclId, ScopeId};

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a stylesheet tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSS parsing error.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// File I/O error.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scope handle does not belong to this stylesheet.
    #[error("Unknown scope handle {0:?}")]
    InvalidScope(ScopeId),

    /// The declaration handle does not belong to this stylesheet.
    #[error("Unknown declaration handle {0:?}")]
    InvalidDeclaration(DeclId),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
