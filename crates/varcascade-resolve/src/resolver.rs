//! Cascade-aware `var()` resolution.

use varcascade_core::logging::targets;
use varcascade_core::prelude::*;

use crate::cycle::has_circular_or_self_reference;
use crate::error::{ResolveError, Result};
use crate::extract::{extract, referenced_variables, split_var_arguments};
use crate::options::{Invocation, ResolveOptions};
use crate::scope::{ScopeGraph, ScopeRef, list_is_under, strip_pseudo_list};
use crate::usage::{IgnoreUsages, UsageSite, VarCollector, VarUsage};
use crate::var_map::{VarEntry, VarMap};

/// A diagnostic attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable description.
    pub message: String,
    /// The declaration being resolved when the problem was found.
    pub node: DeclId,
}

impl Warning {
    fn undefined(name: &str, node: DeclId) -> Self {
        Self {
            message: format!("variable {name} is undefined and used without a fallback"),
            node,
        }
    }
}

/// The outcome of resolving one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// The value with every `var()` call substituted, or `None` if any
    /// reference could not be resolved.
    pub value: Option<String>,
    /// Variables the value references directly, in first-seen order.
    pub variables_used: Vec<String>,
    /// Problems found while resolving.
    pub warnings: Vec<Warning>,
}

impl Resolution {
    /// Whether every reference was resolved.
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }
}

/// Resolves declaration values of one stylesheet.
///
/// Resolved custom-property values are cached on their declarations, so a
/// resolver (or a later one over the same stylesheet) reuses work done for
/// earlier declarations.
///
/// # Example
///
/// ```ignore
/// let sheet = Stylesheet::parse(":root { --gap: 4px } .card { margin: var(--gap) }")?;
/// let vars = VarMap::index(&sheet);
/// let mut resolver = Resolver::new(&sheet, &vars, ResolveOptions::default());
///
/// let margin = sheet.declarations()[1];
/// assert_eq!(resolver.resolve(margin)?.value.as_deref(), Some("4px"));
/// ```
#[derive(Debug)]
pub struct Resolver<'a> {
    graph: ScopeGraph<'a>,
    vars: &'a VarMap,
    options: ResolveOptions,
    evaluations: usize,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `sheet` using the variables indexed in `vars`.
    pub fn new(sheet: &'a Stylesheet, vars: &'a VarMap, options: ResolveOptions) -> Self {
        Self {
            graph: ScopeGraph::new(sheet),
            vars,
            options,
            evaluations: 0,
        }
    }

    /// The options in effect.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Number of values evaluated so far, nested evaluations included.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Resolve the value of `decl`.
    pub fn resolve(&mut self, decl: DeclId) -> Result<Resolution> {
        self.resolve_collecting(decl, &mut IgnoreUsages)
    }

    /// Resolve the value of `decl`, reporting each direct reference to
    /// `collector`.
    #[tracing::instrument(level = "trace", skip(self, collector))]
    pub fn resolve_collecting(
        &mut self,
        decl: DeclId,
        collector: &mut dyn VarCollector,
    ) -> Result<Resolution> {
        let sheet = self.graph.sheet();
        let declaration = sheet.declaration(decl);
        let spliced_before = self.graph.spliced_len();

        let result = self.resolve_value(
            declaration.value(),
            declaration.parent().into(),
            decl,
            Invocation::TopLevel,
            Some(collector),
        );
        self.graph.truncate_spliced(spliced_before);

        let resolution = result?;
        if let Some(value) = resolution.value.as_ref().filter(|_| self.uses_cache()) {
            declaration.cache_value(value.clone());
        }
        for warning in &resolution.warnings {
            tracing::debug!(target: targets::RESOLVE, property = declaration.property(), "{}", warning.message);
        }
        Ok(resolution)
    }

    fn resolve_value(
        &mut self,
        value: &str,
        scope: ScopeRef,
        node: DeclId,
        invocation: Invocation,
        mut collector: Option<&mut dyn VarCollector>,
    ) -> Result<Resolution> {
        let sheet = self.graph.sheet();
        let property = sheet.declaration(node).property();
        if invocation.depth() > self.options.max_depth {
            return Err(ResolveError::depth_limit(self.options.max_depth, property));
        }
        self.evaluations += 1;

        // Discovery pass: names only, the value is not touched.
        let mut variables_used: Vec<String> = Vec::new();
        for reference in referenced_variables(value) {
            if let Some(collector) = collector.as_deref_mut() {
                collector.collect(&VarUsage {
                    name: reference.name.clone(),
                    usage: UsageSite {
                        selector: self.graph.selector_text(scope),
                        property: property.to_string(),
                        fallback_text: reference.fallback.clone().unwrap_or_default(),
                    },
                });
            }
            if !variables_used.contains(&reference.name) {
                variables_used.push(reference.name);
            }
        }

        // Substitution pass. Only the text after each call is scanned again,
        // so substituted values are never re-expanded.
        let mut circular: Option<bool> = None;
        let mut warnings = Vec::new();
        let mut unresolved = false;
        let mut output = String::with_capacity(value.len());
        let mut rest = value.to_string();

        while let Some(found) = extract(&rest) {
            let (name, fallback) = split_var_arguments(&found.body);
            let matched = self.select_declaration(name, scope);
            let use_match = matched.is_some()
                && !*circular.get_or_insert_with(|| has_circular_or_self_reference(&variables_used, self.vars));

            let replacement = match matched {
                Some(decl) if use_match => self.resolve_matched(decl, scope, invocation)?,
                _ => match matched.and_then(|decl| self.cached_value(decl)) {
                    Some(cached) => Some(cached.to_string()),
                    None => self.resolve_fallback(fallback, scope, node, invocation)?,
                },
            };

            tracing::trace!(
                target: targets::RESOLVE,
                name,
                matched = matched.is_some(),
                resolved = replacement.is_some(),
                "substituting reference"
            );

            output.push_str(&found.pre);
            match replacement {
                Some(replacement) => output.push_str(&replacement),
                None => {
                    unresolved = true;
                    warnings.push(Warning::undefined(name, node));
                }
            }
            rest = found.post;
        }
        output.push_str(&rest);

        Ok(Resolution {
            value: (!unresolved).then_some(output),
            variables_used,
            warnings,
        })
    }

    /// The declaration of `name` that applies at `scope`: the last visible
    /// one in source order, unless an earlier `!important` one pins it.
    fn select_declaration(&self, name: &str, scope: ScopeRef) -> Option<DeclId> {
        let vars: &'a VarMap = self.vars;
        let sheet = self.graph.sheet();
        let entries = vars.get(name);
        if entries.is_empty() {
            return None;
        }

        let reference = strip_pseudo_list(self.graph.scope_list(scope));
        let mut best: Option<&VarEntry> = None;
        for entry in entries {
            let candidate = ScopeRef::Sheet(sheet.declaration(entry.decl()).parent());
            if !list_is_under(&reference, candidate, &self.graph, self.options.ignore_pseudo_scope) {
                continue;
            }
            if best.is_some_and(|current| current.is_important() && !entry.is_important()) {
                continue;
            }
            best = Some(entry);
        }
        best.map(VarEntry::decl)
    }

    fn resolve_fallback(
        &mut self,
        fallback: Option<&str>,
        scope: ScopeRef,
        node: DeclId,
        invocation: Invocation,
    ) -> Result<Option<String>> {
        match fallback {
            None => Ok(None),
            Some("") => Ok(Some(String::new())),
            Some(text) => {
                let resolution = self.resolve_value(text, scope, node, invocation.nested(), None)?;
                discard_warnings(&resolution);
                Ok(resolution.value)
            }
        }
    }

    /// Resolve a matched declaration as if it were declared inside the
    /// reference's enclosing at-rule context.
    fn resolve_matched(
        &mut self,
        decl: DeclId,
        reference: ScopeRef,
        invocation: Invocation,
    ) -> Result<Option<String>> {
        let sheet = self.graph.sheet();
        let declaration = sheet.declaration(decl);
        let own_scope = ScopeRef::Sheet(declaration.parent());

        let anchor = self.graph.parent(reference).unwrap_or(reference);
        let innermost = self
            .graph
            .scope_list(anchor)
            .into_iter()
            .next()
            .and_then(|mut branch| branch.pop());
        let stop_at = innermost
            .as_deref()
            .and_then(|selector| self.graph.find_ancestor_with_selector(selector, own_scope));

        let spliced = self
            .graph
            .splice_parent_onto(decl, anchor, |scope| Some(scope) == stop_at);
        let in_place = self.graph.scope_list(spliced.parent) == self.graph.scope_list(own_scope);

        if in_place {
            if let Some(cached) = self.cached_value(decl) {
                tracing::trace!(target: targets::RESOLVE, property = declaration.property(), "reusing cached value");
                return Ok(Some(cached.to_string()));
            }
        }

        let resolution = self.resolve_value(declaration.value(), spliced.parent, decl, invocation.nested(), None)?;
        discard_warnings(&resolution);

        if in_place && self.uses_cache() {
            if let Some(value) = &resolution.value {
                declaration.cache_value(value.clone());
            }
        }
        Ok(resolution.value)
    }

    /// Cached values hold results of the default scope matching, so a
    /// resolver with widened matching neither reads nor writes them.
    fn uses_cache(&self) -> bool {
        !self.options.ignore_pseudo_scope
    }

    fn cached_value(&self, decl: DeclId) -> Option<&'a str> {
        let sheet: &'a Stylesheet = self.graph.sheet();
        sheet.declaration(decl).cached_value().filter(|_| self.uses_cache())
    }
}

/// Resolve one declaration with a fresh resolver.
pub fn resolve_declaration(
    sheet: &Stylesheet,
    vars: &VarMap,
    decl: DeclId,
    options: ResolveOptions,
) -> Result<Resolution> {
    Resolver::new(sheet, vars, options).resolve(decl)
}

fn discard_warnings(resolution: &Resolution) {
    for warning in &resolution.warnings {
        tracing::trace!(target: targets::RESOLVE, "nested: {}", warning.message);
    }
}
