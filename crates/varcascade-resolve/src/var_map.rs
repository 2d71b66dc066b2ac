//! Index of custom-property declarations by name.

use std::collections::HashMap;

use varcascade_core::logging::targets;
use varcascade_core::prelude::*;

use crate::extract::referenced_variables;

/// One declaration of a custom property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarEntry {
    decl: DeclId,
    important: bool,
    dependencies: Vec<String>,
}

impl VarEntry {
    /// The declaring declaration.
    pub fn decl(&self) -> DeclId {
        self.decl
    }

    /// Whether the declaration carries `!important`.
    pub fn is_important(&self) -> bool {
        self.important
    }

    /// Variable names the declaration's value references, without duplicates.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Every custom-property declaration of a stylesheet, grouped by name in
/// source order.
#[derive(Debug, Clone, Default)]
pub struct VarMap {
    entries: HashMap<String, Vec<VarEntry>>,
}

impl VarMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index all custom properties of `sheet`.
    pub fn index(sheet: &Stylesheet) -> Self {
        let mut map = Self::new();
        for decl in sheet.declarations() {
            map.insert(sheet, decl);
        }

        tracing::debug!(
            target: targets::VAR_MAP,
            variables = map.entries.len(),
            "indexed custom properties"
        );
        map
    }

    /// Append a declaration. Ignored unless it declares a custom property.
    ///
    /// Entries must be inserted in source order.
    pub fn insert(&mut self, sheet: &Stylesheet, decl: DeclId) {
        let declaration = sheet.declaration(decl);
        if !declaration.is_custom_property() {
            return;
        }

        let mut dependencies: Vec<String> = Vec::new();
        for reference in referenced_variables(declaration.value()) {
            if !dependencies.contains(&reference.name) {
                dependencies.push(reference.name);
            }
        }

        self.entries
            .entry(declaration.property().to_string())
            .or_default()
            .push(VarEntry {
                decl,
                important: declaration.is_important(),
                dependencies,
            });
    }

    /// Declarations of `name` in source order.
    pub fn get(&self, name: &str) -> &[VarEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether any declaration of `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Variable names referenced by any declaration of `name`.
    pub fn dependencies_of<'m>(&'m self, name: &str) -> impl Iterator<Item = &'m str> + use<'m> {
        self.get(name)
            .iter()
            .flat_map(|entry| entry.dependencies.iter().map(String::as_str))
    }

    /// All declared variable names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct variable names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no custom property was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
