//! Error types for value resolution.

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that abort a resolution.
///
/// Undefined variables and reference cycles are not errors; they are
/// reported as warnings on the [`Resolution`](crate::Resolution).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Nested resolution went deeper than the configured limit.
    #[error("Resolving '{property}' exceeded the maximum depth of {limit}")]
    DepthLimit { limit: usize, property: String },
}

impl ResolveError {
    /// Create a depth limit error.
    pub fn depth_limit(limit: usize, property: impl Into<String>) -> Self {
        Self::DepthLimit {
            limit,
            property: property.into(),
        }
    }
}
