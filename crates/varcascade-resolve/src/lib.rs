//! Cascade-aware custom-property resolution for varcascade.
//!
//! Given a [`Stylesheet`](varcascade_core::tree::Stylesheet), this crate
//! replaces `var(--name[, fallback])` calls in declaration values with the
//! value the cascade gives `--name` at the declaration's scope:
//!
//! - **Extraction**: `var()` calls are found at any nesting depth, including
//!   inside other functions and inside fallbacks
//! - **Cascade selection**: the last declaration whose scope contains the
//!   reference wins, unless an `!important` one was selected first
//! - **Splicing**: a matched declaration is resolved as if it were declared
//!   inside the reference's at-rule context
//! - **Cycle detection**: circular and self references fall back instead of
//!   recursing
//!
//! # Example
//!
//! ```ignore
//! use varcascade_core::prelude::*;
//! use varcascade_resolve::prelude::*;
//!
//! let sheet = Stylesheet::parse(":root { --x: 1px } .a { --x: 2px; width: var(--x) }")?;
//! let vars = VarMap::index(&sheet);
//! let mut resolver = Resolver::new(&sheet, &vars, ResolveOptions::default());
//!
//! let width = sheet.declarations()[2];
//! assert_eq!(resolver.resolve(width)?.value.as_deref(), Some("2px"));
//! ```

pub mod cycle;
pub mod extract;
pub mod options;
pub mod scope;
pub mod splice;
pub mod usage;
pub mod var_map;

mod error;
mod resolver;

pub use error::{ResolveError, Result};
pub use resolver::{Resolution, Resolver, Warning, resolve_declaration};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::options::{Invocation, ResolveOptions};
    pub use crate::usage::{IgnoreUsages, UsageSite, VarCollector, VarUsage};
    pub use crate::var_map::VarMap;
    pub use crate::{Resolution, ResolveError, Resolver, Warning};
}
