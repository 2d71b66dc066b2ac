//! Line-oriented scanning of stylesheet sources for `var()` usages.
//!
//! Unlike the resolver, the scanner needs no parsed tree: every line that
//! looks like `property: value` is searched for `var()` calls. This makes it
//! usable on preprocessor sources the tree builder cannot read.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use varcascade_core::logging::targets;
use varcascade_resolve::extract::referenced_variables;

use crate::error::{ReportError, Result};

/// File extension scanned when none is configured.
pub const DEFAULT_SOURCE_EXTENSION: &str = "scss";

const DECLARATION_PATTERN: &str = r"^\s*([\w-]+):\s*(.*)";

/// One `var()` call found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceUsage {
    /// The file the call was found in.
    pub file: PathBuf,
    /// 1-based line number.
    pub line_number: usize,
    /// Property of the declaration line.
    pub property: String,
    /// Fallback text of the call, empty when absent.
    pub fallback_text: String,
}

/// Source usages keyed by variable name.
pub type SourceUsages = BTreeMap<String, Vec<SourceUsage>>;

/// Scans source files with one extension.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    pattern: Regex,
    extension: String,
}

impl SourceScanner {
    /// Create a scanner for files ending in `.{extension}`.
    pub fn new(extension: impl Into<String>) -> Result<Self> {
        let extension = extension.into();
        Ok(Self {
            pattern: Regex::new(DECLARATION_PATTERN)?,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    /// The scanned extension, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Scan every matching file under `dir`, recursively.
    pub fn scan_dir(&self, dir: impl AsRef<Path>) -> Result<SourceUsages> {
        let mut usages = SourceUsages::new();
        let files = self.source_files(dir.as_ref())?;
        for file in &files {
            self.scan_file(file, &mut usages)?;
        }

        tracing::debug!(
            target: targets::REPORT,
            files = files.len(),
            variables = usages.len(),
            "scanned sources"
        );
        Ok(usages)
    }

    /// Scan one file into `usages`.
    pub fn scan_file(&self, path: &Path, usages: &mut SourceUsages) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        self.scan_text(path, &text, usages);
        Ok(())
    }

    /// Scan source text attributed to `file` into `usages`.
    pub fn scan_text(&self, file: &Path, text: &str, usages: &mut SourceUsages) {
        for (index, line) in text.lines().enumerate() {
            let Some(captures) = self.pattern.captures(line) else {
                continue;
            };
            let property = &captures[1];
            let value = &captures[2];

            for reference in referenced_variables(value) {
                let usage = SourceUsage {
                    file: file.to_path_buf(),
                    line_number: index + 1,
                    property: property.to_string(),
                    fallback_text: reference.fallback.unwrap_or_default(),
                };
                let entry = usages.entry(reference.name).or_default();
                if !entry.contains(&usage) {
                    entry.push(usage);
                }
            }
        }
    }

    /// Matching files under `dir` in sorted order. Symbolic links are not
    /// followed.
    fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let entries = std::fs::read_dir(&current).map_err(|e| ReportError::io(&current, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| ReportError::io(&current, e))?;
                let path = entry.path();
                let file_type = entry.file_type().map_err(|e| ReportError::io(&path, e))?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && path.extension() == Some(OsStr::new(&self.extension)) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Scan every `.{extension}` file under `dir`.
pub fn scan_source_dir(dir: impl AsRef<Path>, extension: &str) -> Result<SourceUsages> {
    SourceScanner::new(extension)?.scan_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> SourceUsages {
        let scanner = SourceScanner::new(DEFAULT_SOURCE_EXTENSION).unwrap();
        let mut usages = SourceUsages::new();
        scanner.scan_text(Path::new("a.scss"), text, &mut usages);
        usages
    }

    #[test]
    fn declaration_lines_are_scanned() {
        let usages = scan(".a {\n  margin: var(--gap) var(--gap, 2px);\n  color: red;\n}\n");

        let gap = &usages["--gap"];
        assert_eq!(gap.len(), 2);
        assert_eq!(gap[0].line_number, 2);
        assert_eq!(gap[0].property, "margin");
        assert_eq!(gap[0].fallback_text, "");
        assert_eq!(gap[1].fallback_text, "2px");
        assert_eq!(gap[1].file, Path::new("a.scss"));
    }

    #[test]
    fn duplicate_calls_on_a_line_are_kept_once() {
        let usages = scan("border: var(--w) solid var(--w);");
        assert_eq!(usages["--w"].len(), 1);
    }

    #[test]
    fn non_declaration_lines_are_ignored() {
        let usages = scan("// width: var(--commented)\n.a:hover { }\n@include x(var(--y));\n");
        assert!(usages.is_empty());
    }

    #[test]
    fn extension_dot_is_optional() {
        assert_eq!(SourceScanner::new(".scss").unwrap().extension(), "scss");
    }
}
