//! Stylesheet scope tree for varcascade.
//!
//! This crate provides the tree that custom-property resolution runs on:
//!
//! - **Scopes**: the document root, block at-rules and style rules, stored in
//!   a slot-map arena and linked by handle
//! - **Declarations**: property/value pairs with an `!important` flag and a
//!   write-once resolved-value cache
//! - **Tree builder**: a `cssparser`-based reader that recovers that
//!   structure from CSS text
//!
//! # Example
//!
//! ```ignore
//! use varcascade_core::prelude::*;
//!
//! let sheet = Stylesheet::parse(":root { --gap: 4px } .card { margin: var(--gap) }")?;
//! for decl in sheet.declarations() {
//!     println!("{}: {}", sheet.declaration(decl).property(), sheet.declaration(decl).value());
//! }
//! ```

pub mod logging;
pub mod parser;
pub mod tree;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::tree::{DeclId, Declaration, Node, Scope, ScopeId, ScopeKind, Stylesheet};
}
