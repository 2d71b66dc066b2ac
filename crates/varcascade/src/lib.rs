//! Cascade-aware CSS custom-property resolution.
//!
//! varcascade replaces `var()` calls in a stylesheet with the values the
//! cascade gives them, and reports where every variable is used.
//!
//! # Crate Organization
//!
//! - [`varcascade_core`]: the stylesheet scope tree and its builder
//! - [`varcascade_resolve`]: `var()` extraction and cascade resolution
//! - [`varcascade_report`]: usage collection, source scanning and JSON reports
//!
//! # Example
//!
//! ```ignore
//! use varcascade::prelude::*;
//!
//! let mut sheet = Stylesheet::parse(":root { --gap: 4px } .card { margin: var(--gap) }")?;
//! let mut collector = UsageCollector::new();
//! let summary = process_stylesheet(&mut sheet, &ResolveOptions::default(), &mut collector)?;
//!
//! merge_compilations([collector.into_records()]).write_json("css-variables.json")?;
//! ```

pub mod cli;

mod error;
mod process;

pub use varcascade_core;
pub use varcascade_report;
pub use varcascade_resolve;

pub use error::{Error, Result};
pub use process::{ProcessSummary, process_stylesheet};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::{Error, ProcessSummary, Result, process_stylesheet};
    pub use varcascade_core::prelude::*;
    pub use varcascade_report::prelude::*;
    pub use varcascade_resolve::prelude::*;
}
