//! Scope nodes: the document root, at-rules and style rules.

use super::{DeclId, ScopeId};

/// What kind of block a [`Scope`] is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// The document root. Exactly one per stylesheet.
    Root,
    /// A style rule such as `.a, .b { ... }`.
    Rule {
        /// Comma-separated selectors, trimmed, in source order.
        selectors: Vec<String>,
    },
    /// A block at-rule such as `@media print { ... }`.
    AtRule {
        /// The at-keyword without the leading `@`.
        name: String,
        /// The prelude following the name, trimmed.
        params: String,
    },
}

/// A child entry of a scope, kept in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// A declaration owned by the scope.
    Declaration(DeclId),
    /// A nested scope.
    Scope(ScopeId),
}

/// A node of the stylesheet tree that owns declarations and nested scopes.
#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) kind: ScopeKind,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) position: usize,
    pub(crate) children: Vec<Node>,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, parent: Option<ScopeId>, position: usize) -> Self {
        Self {
            kind,
            parent,
            position,
            children: Vec::new(),
        }
    }

    /// The kind of this scope.
    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    /// The owning scope, `None` only for the root.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Position among the parent's children.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Child declarations and scopes in source order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether this is the document root.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, ScopeKind::Root)
    }

    /// The selector list of a style rule; empty for the root and at-rules.
    pub fn selectors(&self) -> &[String] {
        match &self.kind {
            ScopeKind::Rule { selectors } => selectors,
            _ => &[],
        }
    }

    /// The `@name params` text of an at-rule.
    pub fn at_rule_text(&self) -> Option<String> {
        match &self.kind {
            ScopeKind::AtRule { name, params } if params.is_empty() => Some(format!("@{name}")),
            ScopeKind::AtRule { name, params } => Some(format!("@{name} {params}")),
            _ => None,
        }
    }
}
