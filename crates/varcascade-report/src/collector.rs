//! Per-compilation usage collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use varcascade_resolve::usage::{UsageSite, VarCollector, VarUsage};

/// Every usage of one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    /// The variable name.
    pub name: String,
    /// Distinct places the variable is referenced.
    pub usages: Vec<UsageSite>,
}

impl VariableRecord {
    /// Create a record with no usages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            usages: Vec::new(),
        }
    }
}

/// Usages of one compilation, keyed by variable name.
pub type CompilationUsages = BTreeMap<String, VariableRecord>;

/// Collects usages reported by the resolver.
///
/// Identical usages of a variable are kept once.
#[derive(Debug, Clone, Default)]
pub struct UsageCollector {
    records: CompilationUsages,
}

impl UsageCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one usage.
    pub fn record(&mut self, name: &str, usage: UsageSite) {
        let record = self
            .records
            .entry(name.to_string())
            .or_insert_with(|| VariableRecord::new(name));
        if !record.usages.contains(&usage) {
            record.usages.push(usage);
        }
    }

    /// The records collected so far.
    pub fn records(&self) -> &CompilationUsages {
        &self.records
    }

    /// Consume the collector, returning its records.
    pub fn into_records(self) -> CompilationUsages {
        self.records
    }

    /// Number of distinct variables seen.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl VarCollector for UsageCollector {
    fn collect(&mut self, usage: &VarUsage) {
        self.record(&usage.name, usage.usage.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(property: &str, fallback: &str) -> UsageSite {
        UsageSite {
            selector: Some(".a".into()),
            property: property.into(),
            fallback_text: fallback.into(),
        }
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut collector = UsageCollector::new();
        collector.record("--x", site("width", ""));
        collector.record("--x", site("width", ""));
        collector.record("--x", site("height", ""));
        collector.record("--y", site("width", "1px"));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.records()["--x"].usages.len(), 2);
        assert_eq!(collector.records()["--y"].name, "--y");
    }

    #[test]
    fn collects_from_resolver_usages() {
        let mut collector = UsageCollector::new();
        let usage = VarUsage {
            name: "--x".into(),
            usage: site("width", ""),
        };
        collector.collect(&usage);

        assert_eq!(collector.into_records()["--x"].usages, vec![site("width", "")]);
    }
}
