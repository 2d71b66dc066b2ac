//! Arena-backed stylesheet tree.
//!
//! Scopes and declarations live in [`SlotMap`]s and refer to each other by
//! handle, so parent links never alias and relocated copies can be built
//! without touching the tree.

mod declaration;
mod scope;

use std::path::{Path, PathBuf};

use slotmap::{SlotMap, new_key_type};

pub use declaration::Declaration;
pub use scope::{Node, Scope, ScopeKind};

use crate::logging::targets;
use crate::{Error, Result};

new_key_type! {
    /// Handle to a [`Scope`] in a [`Stylesheet`].
    pub struct ScopeId;

    /// Handle to a [`Declaration`] in a [`Stylesheet`].
    pub struct DeclId;
}

/// A parsed stylesheet: one root scope and everything nested under it.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    scopes: SlotMap<ScopeId, Scope>,
    declarations: SlotMap<DeclId, Declaration>,
    root: ScopeId,
    source_path: Option<PathBuf>,
}

impl Stylesheet {
    /// Create an empty stylesheet containing only the root scope.
    pub fn new() -> Self {
        let mut scopes = SlotMap::with_key();
        let root = scopes.insert(Scope::new(ScopeKind::Root, None, 0));
        Self {
            scopes,
            declarations: SlotMap::with_key(),
            root,
            source_path: None,
        }
    }

    /// Parse a stylesheet from CSS text.
    pub fn parse(css: &str) -> Result<Self> {
        crate::parser::parse_stylesheet(css)
    }

    /// Load and parse a stylesheet from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut sheet = Self::parse(&content)?;
        sheet.source_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// The file this stylesheet was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The root scope.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Look up a scope.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this stylesheet.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Look up a scope, returning `None` for foreign handles.
    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Look up a declaration.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this stylesheet.
    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id]
    }

    /// Look up a declaration, returning `None` for foreign handles.
    pub fn get_declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id)
    }

    /// Number of declarations in the stylesheet.
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Append a style rule under `parent`.
    pub fn add_rule<S: Into<String>>(
        &mut self,
        parent: ScopeId,
        selectors: impl IntoIterator<Item = S>,
    ) -> Result<ScopeId> {
        let selectors = selectors.into_iter().map(Into::into).collect();
        self.add_scope(parent, ScopeKind::Rule { selectors })
    }

    /// Append a block at-rule under `parent`.
    pub fn add_at_rule(
        &mut self,
        parent: ScopeId,
        name: impl Into<String>,
        params: impl Into<String>,
    ) -> Result<ScopeId> {
        let kind = ScopeKind::AtRule {
            name: name.into(),
            params: params.into(),
        };
        self.add_scope(parent, kind)
    }

    fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> Result<ScopeId> {
        let position = self
            .scopes
            .get(parent)
            .ok_or(Error::InvalidScope(parent))?
            .children
            .len();
        let id = self.scopes.insert(Scope::new(kind, Some(parent), position));
        self.scopes[parent].children.push(Node::Scope(id));
        tracing::trace!(target: targets::TREE, ?id, ?parent, "added scope");
        Ok(id)
    }

    /// Append a declaration under `parent`.
    pub fn add_declaration(
        &mut self,
        parent: ScopeId,
        property: impl Into<String>,
        value: impl Into<String>,
        important: bool,
    ) -> Result<DeclId> {
        let scope = self
            .scopes
            .get_mut(parent)
            .ok_or(Error::InvalidScope(parent))?;
        let id = self
            .declarations
            .insert(Declaration::new(property, value, important, parent));
        scope.children.push(Node::Declaration(id));
        Ok(id)
    }

    /// Replace a declaration's value, clearing its resolution cache.
    pub fn set_value(&mut self, id: DeclId, value: impl Into<String>) -> Result<()> {
        let decl = self
            .declarations
            .get_mut(id)
            .ok_or(Error::InvalidDeclaration(id))?;
        decl.value = value.into();
        decl.resolved.take();
        Ok(())
    }

    /// Iterate from `scope` up to the root, starting with `scope` itself.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |id| {
            self.scopes.get(*id).and_then(Scope::parent)
        })
    }

    /// All declarations in source order (depth-first, pre-order).
    pub fn declarations(&self) -> Vec<DeclId> {
        let mut out = Vec::with_capacity(self.declarations.len());
        // Each frame is a scope plus the index of its next unvisited child.
        let mut frames: Vec<(ScopeId, usize)> = vec![(self.root, 0)];
        while let Some((id, cursor)) = frames.pop() {
            let children = &self.scopes[id].children;
            let Some(child) = children.get(cursor) else {
                continue;
            };
            frames.push((id, cursor + 1));
            match *child {
                Node::Declaration(decl) => out.push(decl),
                Node::Scope(nested) => frames.push((nested, 0)),
            }
        }
        out
    }

    /// The comma-joined selector list of a style rule.
    pub fn selector_text(&self, scope: ScopeId) -> Option<String> {
        match &self.scopes.get(scope)?.kind {
            ScopeKind::Rule { selectors } => Some(selectors.join(", ")),
            _ => None,
        }
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}
