//! TOML-backed report configuration.
//!
//! ```toml
//! output = "build/css-variables.json"
//! source_dir = "src/styles"
//! source_extension = "scss"
//! ignore_pseudo_scope = false
//! max_depth = 64
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use varcascade_resolve::options::{DEFAULT_MAX_DEPTH, ResolveOptions};

use crate::error::{ReportError, Result};
use crate::report::DEFAULT_REPORT_FILE;
use crate::source_scan::DEFAULT_SOURCE_EXTENSION;

/// Settings for a report run. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where the JSON report is written.
    pub output: PathBuf,
    /// Source tree scanned for usages, if any.
    pub source_dir: Option<PathBuf>,
    /// Extension of scanned source files.
    pub source_extension: String,
    /// See [`ResolveOptions::ignore_pseudo_scope`].
    pub ignore_pseudo_scope: bool,
    /// See [`ResolveOptions::max_depth`].
    pub max_depth: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_REPORT_FILE),
            source_dir: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            ignore_pseudo_scope: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Resolver options derived from this configuration.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::default()
            .with_ignore_pseudo_scope(self.ignore_pseudo_scope)
            .with_max_depth(self.max_depth)
    }
}
