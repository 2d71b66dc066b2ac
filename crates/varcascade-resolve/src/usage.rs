//! Variable usage records handed to collectors.

use serde::{Deserialize, Serialize};

/// Where a variable is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSite {
    /// Selector list of the referencing rule; `None` outside style rules.
    pub selector: Option<String>,
    /// Property of the referencing declaration.
    pub property: String,
    /// Fallback text of the `var()` call, empty when absent.
    pub fallback_text: String,
}

/// A variable name and one place it is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarUsage {
    /// The referenced variable.
    pub name: String,
    /// The referencing site.
    pub usage: UsageSite,
}

/// Receives every variable directly referenced by top-level resolutions.
///
/// Closures taking `&VarUsage` implement this trait.
pub trait VarCollector {
    /// Record one reference.
    fn collect(&mut self, usage: &VarUsage);
}

impl<F: FnMut(&VarUsage)> VarCollector for F {
    fn collect(&mut self, usage: &VarUsage) {
        self(usage)
    }
}

/// A collector that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreUsages;

impl VarCollector for IgnoreUsages {
    fn collect(&mut self, _usage: &VarUsage) {}
}
