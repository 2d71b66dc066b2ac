//! Custom-property usage reports for varcascade.
//!
//! Two independent sources of usages feed a report:
//!
//! - **Compilations**: a [`UsageCollector`] passed to the resolver records
//!   every variable each resolved declaration references
//! - **Sources**: the [`SourceScanner`] greps raw source files line by line,
//!   so preprocessor sources can be cross-referenced
//!
//! [`merge_compilations`] combines collectors into a [`Report`], which can
//! be overlaid with scanned source usages and written as JSON.
//!
//! # Example
//!
//! ```ignore
//! use varcascade_report::prelude::*;
//!
//! let mut report = merge_compilations([collector.into_records()]);
//! report.overlay_source_usages(&scan_source_dir("src/styles", "scss")?);
//! report.write_json(DEFAULT_REPORT_FILE)?;
//! ```

pub mod collector;
pub mod config;
pub mod report;
pub mod source_scan;

mod error;

pub use error::{ReportError, Result};

pub use collector::{CompilationUsages, UsageCollector, VariableRecord};
pub use config::ReportConfig;
pub use report::{DEFAULT_REPORT_FILE, Report, ReportEntry, merge_compilations};
pub use source_scan::{SourceScanner, SourceUsage, SourceUsages, scan_source_dir};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::{
        DEFAULT_REPORT_FILE, Report, ReportConfig, ReportError, SourceUsages, UsageCollector,
        merge_compilations, scan_source_dir,
    };
}
