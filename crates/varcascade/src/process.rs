//! Resolving every declaration of a stylesheet.

use varcascade_core::logging::targets;
use varcascade_core::prelude::*;
use varcascade_resolve::extract::has_var_reference;
use varcascade_resolve::prelude::*;

use crate::Result;

/// What [`process_stylesheet`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Declarations whose value was replaced, in source order.
    pub rewritten: Vec<DeclId>,
    /// Declarations left untouched because a reference was undefined or
    /// resolution failed.
    pub unresolved: Vec<DeclId>,
    /// Declarations whose resolution failed, with the error.
    pub failed: Vec<(DeclId, ResolveError)>,
    /// Warnings of every resolution, failures included.
    pub warnings: Vec<Warning>,
}

/// Resolve every declaration containing a `var()` call and rewrite its value.
///
/// Values are rewritten only after all declarations are resolved, so every
/// resolution sees the stylesheet as written. Declarations with an undefined
/// reference keep their text, and so do declarations whose resolution fails:
/// a failure is recorded in the summary and the pass continues.
pub fn process_stylesheet(
    sheet: &mut Stylesheet,
    options: &ResolveOptions,
    collector: &mut dyn VarCollector,
) -> Result<ProcessSummary> {
    let vars = VarMap::index(sheet);
    let mut summary = ProcessSummary::default();
    let mut updates = Vec::new();

    {
        let mut resolver = Resolver::new(sheet, &vars, *options);
        for decl in sheet.declarations() {
            if !has_var_reference(sheet.declaration(decl).value()) {
                continue;
            }

            let resolution = match resolver.resolve_collecting(decl, collector) {
                Ok(resolution) => resolution,
                Err(error) => {
                    tracing::debug!(
                        target: targets::RESOLVE,
                        property = sheet.declaration(decl).property(),
                        "{error}"
                    );
                    summary.warnings.push(Warning {
                        message: error.to_string(),
                        node: decl,
                    });
                    summary.unresolved.push(decl);
                    summary.failed.push((decl, error));
                    continue;
                }
            };
            summary.warnings.extend(resolution.warnings);
            match resolution.value {
                Some(value) => updates.push((decl, value)),
                None => summary.unresolved.push(decl),
            }
        }

        tracing::debug!(
            target: targets::RESOLVE,
            evaluations = resolver.evaluations(),
            resolved = updates.len(),
            unresolved = summary.unresolved.len(),
            failed = summary.failed.len(),
            "resolved stylesheet"
        );
    }

    for (decl, value) in updates {
        sheet.set_value(decl, value)?;
        summary.rewritten.push(decl);
    }
    Ok(summary)
}
