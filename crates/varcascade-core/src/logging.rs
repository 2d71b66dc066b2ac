//! Tracing targets used across varcascade.
//!
//! varcascade uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the embedding application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("varcascade_resolve=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Stylesheet tree construction and editing.
    pub const TREE: &str = "varcascade_core::tree";
    /// CSS tree builder.
    pub const PARSER: &str = "varcascade_core::parser";
    /// Variable declaration map indexing.
    pub const VAR_MAP: &str = "varcascade_resolve::var_map";
    /// Value resolution.
    pub const RESOLVE: &str = "varcascade_resolve::resolver";
    /// Scope splicing.
    pub const SPLICE: &str = "varcascade_resolve::splice";
    /// Usage reporting.
    pub const REPORT: &str = "varcascade_report";
    /// Command-line runs.
    pub const CLI: &str = "varcascade";
}
