//! Merged usage reports and their JSON form.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use varcascade_core::logging::targets;
use varcascade_resolve::usage::UsageSite;

use crate::collector::CompilationUsages;
use crate::error::{ReportError, Result};
use crate::source_scan::{SourceUsage, SourceUsages};

/// Report file name used when none is configured.
pub const DEFAULT_REPORT_FILE: &str = "css-variables.json";

/// One variable in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// The variable name.
    pub name: String,
    /// Usages across all compilations, in merge order.
    pub usages: Vec<UsageSite>,
    /// Usages found by the source scanner. Absent until sources are
    /// overlaid; `Some(None)` (serialized as `null`) when the scanner never
    /// saw the variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_usages: Option<Option<Vec<SourceUsage>>>,
}

/// Usages of every variable across compilations, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: BTreeMap<String, ReportEntry>,
}

/// Merge per-compilation usages into one report.
///
/// Usages of a variable seen by several compilations are concatenated in
/// iteration order.
pub fn merge_compilations<I>(compilations: I) -> Report
where
    I: IntoIterator<Item = CompilationUsages>,
{
    let mut report = Report::default();
    for compilation in compilations {
        for (name, record) in compilation {
            report
                .entries
                .entry(name)
                .or_insert_with(|| ReportEntry {
                    name: record.name.clone(),
                    usages: Vec::new(),
                    source_usages: None,
                })
                .usages
                .extend(record.usages);
        }
    }
    report
}

impl Report {
    /// The entry for `name`.
    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.get(name)
    }

    /// Entries sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.values()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach scanned source usages to every entry.
    ///
    /// Variables the scanner never saw get an explicit empty marker.
    /// Variables only the scanner saw are not added.
    pub fn overlay_source_usages(&mut self, sources: &SourceUsages) {
        for (name, entry) in &mut self.entries {
            entry.source_usages = Some(sources.get(name).cloned());
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON to `path`.
    ///
    /// The report is written to a temporary file beside `path` and renamed
    /// into place, so readers never see a partial report.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| ReportError::io(dir, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| ReportError::io(path, e))?;
        file.persist(path).map_err(|e| ReportError::io(path, e.error))?;

        tracing::info!(
            target: targets::REPORT,
            path = %path.display(),
            variables = self.len(),
            "wrote usage report"
        );
        Ok(())
    }
}
