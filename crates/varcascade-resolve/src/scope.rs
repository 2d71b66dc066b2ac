//! Scope containment over the stylesheet tree and its spliced copies.
//!
//! A scope is described by its *scope list*: every selector path from the
//! root down to the scope, one branch per combination of comma-separated
//! selectors. Each branch is a list of pieces: descendant compound selectors
//! and `@name params` texts for at-rules.

use cssparser::Token;
use varcascade_core::parser::split_top_level;
use varcascade_core::prelude::*;

/// Selector paths from the root to a scope.
pub type ScopeList = Vec<Vec<String>>;

/// Handle to a transient spliced scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplicedId(pub(crate) usize);

/// A scope that is either part of the stylesheet or a spliced copy of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    /// A scope of the stylesheet tree.
    Sheet(ScopeId),
    /// A transient copy with a rewritten parent.
    Spliced(SplicedId),
}

impl From<ScopeId> for ScopeRef {
    fn from(id: ScopeId) -> Self {
        Self::Sheet(id)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SplicedScope {
    pub(crate) origin: ScopeId,
    pub(crate) parent: ScopeRef,
}

/// The stylesheet tree plus an arena of spliced scopes layered over it.
///
/// Spliced scopes copy the kind of a real scope but hang under a different
/// parent. The stylesheet itself is never modified.
#[derive(Debug)]
pub struct ScopeGraph<'a> {
    sheet: &'a Stylesheet,
    pub(crate) spliced: Vec<SplicedScope>,
}

impl<'a> ScopeGraph<'a> {
    /// Create a graph over `sheet` with no spliced scopes.
    pub fn new(sheet: &'a Stylesheet) -> Self {
        Self {
            sheet,
            spliced: Vec::new(),
        }
    }

    /// The underlying stylesheet.
    pub fn sheet(&self) -> &'a Stylesheet {
        self.sheet
    }

    /// The stylesheet scope `scope` is, or was copied from.
    pub fn origin(&self, scope: ScopeRef) -> ScopeId {
        match scope {
            ScopeRef::Sheet(id) => id,
            ScopeRef::Spliced(SplicedId(index)) => self.spliced[index].origin,
        }
    }

    /// The parent of `scope`, `None` only for the stylesheet root.
    pub fn parent(&self, scope: ScopeRef) -> Option<ScopeRef> {
        match scope {
            ScopeRef::Sheet(id) => self.sheet.scope(id).parent().map(ScopeRef::Sheet),
            ScopeRef::Spliced(SplicedId(index)) => Some(self.spliced[index].parent),
        }
    }

    /// Number of spliced scopes currently alive.
    pub fn spliced_len(&self) -> usize {
        self.spliced.len()
    }

    /// Drop spliced scopes created after `len` were alive.
    pub fn truncate_spliced(&mut self, len: usize) {
        self.spliced.truncate(len);
    }

    /// Selector paths from the root down to `scope`.
    ///
    /// The root contributes no piece, so the root's list is one empty branch.
    pub fn scope_list(&self, scope: ScopeRef) -> ScopeList {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }

        let mut list: ScopeList = vec![Vec::new()];
        for link in chain.into_iter().rev() {
            let own = own_pieces(self.sheet.scope(self.origin(link)));
            if own.is_empty() {
                continue;
            }
            list = list
                .iter()
                .flat_map(|branch| {
                    own.iter().map(move |pieces| {
                        let mut extended = branch.clone();
                        extended.extend(pieces.iter().cloned());
                        extended
                    })
                })
                .collect();
        }
        list
    }

    /// Whether declarations of `candidate` are visible from `reference`.
    ///
    /// Every piece of some candidate branch must appear, in order, along some
    /// reference branch. `:root`, `html` and `*` are satisfied by the root.
    /// Pseudo-classes are stripped from the reference; with `ignore_pseudo`
    /// they are stripped from the candidate too.
    pub fn is_under_scope(&self, reference: ScopeRef, candidate: ScopeRef, ignore_pseudo: bool) -> bool {
        let reference = strip_pseudo_list(self.scope_list(reference));
        list_is_under(&reference, candidate, self, ignore_pseudo)
    }

    /// The nearest scope from `start` upward whose own selectors include
    /// `selector`. The root is never returned.
    pub fn find_ancestor_with_selector(&self, selector: &str, start: ScopeRef) -> Option<ScopeRef> {
        let mut current = start;
        while let Some(parent) = self.parent(current) {
            let own = own_pieces(self.sheet.scope(self.origin(current)));
            if own.iter().flatten().any(|piece| piece == selector) {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// The selector text of the stylesheet scope behind `scope`.
    pub fn selector_text(&self, scope: ScopeRef) -> Option<String> {
        self.sheet.selector_text(self.origin(scope))
    }
}

/// Containment test against an already stripped reference list.
pub(crate) fn list_is_under(
    reference: &ScopeList,
    candidate: ScopeRef,
    graph: &ScopeGraph<'_>,
    ignore_pseudo: bool,
) -> bool {
    let mut candidate = graph.scope_list(candidate);
    if ignore_pseudo {
        candidate = strip_pseudo_list(candidate);
    }

    candidate.iter().any(|branch| {
        reference
            .iter()
            .any(|reference_branch| branch_is_under(reference_branch, branch))
    })
}

fn branch_is_under(reference: &[String], candidate: &[String]) -> bool {
    let mut offset = 0;
    for piece in candidate {
        match reference[offset..]
            .iter()
            .position(|node| piece_matches(node, piece))
        {
            Some(found) => offset += found + 1,
            None if is_always_ancestor(piece) => {}
            None => return false,
        }
    }
    true
}

/// `.a.b` satisfies `.b`; `div` only satisfies `div`.
fn piece_matches(node: &str, piece: &str) -> bool {
    node == piece || (node.ends_with(piece) && piece.starts_with(['.', '#', '[', ':']))
}

fn is_always_ancestor(piece: &str) -> bool {
    matches!(piece, ":root" | "html" | "*")
}

/// The pieces one scope adds, one list per comma-separated selector.
fn own_pieces(scope: &Scope) -> ScopeList {
    match scope.kind() {
        ScopeKind::Root => Vec::new(),
        ScopeKind::Rule { selectors } => selectors.iter().map(|s| descendant_pieces(s)).collect(),
        ScopeKind::AtRule { .. } => scope.at_rule_text().into_iter().map(|text| vec![text]).collect(),
    }
}

/// Split a selector into compound selectors at top-level combinators.
///
/// The combinators themselves are dropped, so `.a > .b` and `.a .b` yield
/// the same pieces.
pub fn descendant_pieces(selector: &str) -> Vec<String> {
    split_top_level(selector, |token| {
        matches!(token, Token::WhiteSpace(_) | Token::Delim('>' | '+' | '~'))
    })
}

/// Drop the pseudo-class suffix of a selector piece.
///
/// `.a:hover` becomes `.a`; a leading pseudo such as `:root` and
/// pseudo-elements (`::before`) are kept, as are at-rule pieces.
pub fn strip_pseudo(piece: &str) -> &str {
    if piece.starts_with('@') {
        return piece;
    }

    let bytes = piece.as_bytes();
    let mut depth = 0usize;
    for (index, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && index > 0 && bytes[index - 1] != b':' => {
                return &piece[..index];
            }
            _ => {}
        }
    }
    piece
}

pub(crate) fn strip_pseudo_list(list: ScopeList) -> ScopeList {
    list.into_iter()
        .map(|branch| {
            branch
                .into_iter()
                .map(|piece| strip_pseudo(&piece).to_string())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(css: &str) -> Stylesheet {
        Stylesheet::parse(css).unwrap()
    }

    fn scope_of(sheet: &Stylesheet, index: usize) -> ScopeRef {
        let decl = sheet.declarations()[index];
        ScopeRef::Sheet(sheet.declaration(decl).parent())
    }

    #[test]
    fn scope_list_crosses_selector_lists() {
        let sheet = sheet("@media print { .a, .b { .c .d { color: red } } }");
        let graph = ScopeGraph::new(&sheet);

        assert_eq!(
            graph.scope_list(scope_of(&sheet, 0)),
            vec![
                vec!["@media print", ".a", ".c", ".d"],
                vec!["@media print", ".b", ".c", ".d"],
            ]
        );
    }

    #[test]
    fn root_scope_list_is_empty_branch() {
        let sheet = sheet("color: red");
        let graph = ScopeGraph::new(&sheet);

        assert_eq!(graph.scope_list(sheet.root().into()), vec![Vec::<String>::new()]);
    }

    #[test]
    fn descendant_pieces_drop_combinators() {
        assert_eq!(descendant_pieces(".a > .b"), vec![".a", ".b"]);
        assert_eq!(descendant_pieces(".a+.b ~ .c"), vec![".a", ".b", ".c"]);
        assert_eq!(
            descendant_pieces("li:nth-child(2n + 1) a[title~=\"x y\"]"),
            vec!["li:nth-child(2n + 1)", "a[title~=\"x y\"]"]
        );
        assert_eq!(descendant_pieces(".a /* x */ .b>.c"), vec![".a", ".b", ".c"]);
    }

    #[test]
    fn strip_pseudo_keeps_leading_and_elements() {
        assert_eq!(strip_pseudo(".a:hover"), ".a");
        assert_eq!(strip_pseudo(":root"), ":root");
        assert_eq!(strip_pseudo(":root:hover"), ":root");
        assert_eq!(strip_pseudo("::before"), "::before");
        assert_eq!(strip_pseudo(".a[href^=\"x:y\"]"), ".a[href^=\"x:y\"]");
        assert_eq!(strip_pseudo("@media (min-width: 1px)"), "@media (min-width: 1px)");
    }

    #[test]
    fn containment_follows_ancestry() {
        let sheet = sheet(":root { --x: 1 } .a { --x: 2 } .a .b { w: 1 } .c { w: 2 }");
        let graph = ScopeGraph::new(&sheet);
        let root_rule = scope_of(&sheet, 0);
        let a = scope_of(&sheet, 1);
        let nested = scope_of(&sheet, 2);
        let c = scope_of(&sheet, 3);

        assert!(graph.is_under_scope(nested, a, false));
        assert!(graph.is_under_scope(nested, root_rule, false));
        assert!(graph.is_under_scope(c, root_rule, false));
        assert!(!graph.is_under_scope(c, a, false));
        assert!(!graph.is_under_scope(a, nested, false));
    }

    #[test]
    fn compound_selector_satisfies_class() {
        let sheet = sheet(".a { --x: 1 } .b.a { w: 1 } div { --y: 1 } .z div { w: 2 }");
        let graph = ScopeGraph::new(&sheet);

        assert!(graph.is_under_scope(scope_of(&sheet, 1), scope_of(&sheet, 0), false));
        assert!(graph.is_under_scope(scope_of(&sheet, 3), scope_of(&sheet, 2), false));
    }

    #[test]
    fn pseudo_candidates_need_ignore_flag() {
        let sheet = sheet(".a:hover { --x: 1 } .a { w: 1 } .a:focus { w: 2 }");
        let graph = ScopeGraph::new(&sheet);
        let hover = scope_of(&sheet, 0);
        let plain = scope_of(&sheet, 1);
        let focus = scope_of(&sheet, 2);

        assert!(!graph.is_under_scope(plain, hover, false));
        assert!(graph.is_under_scope(plain, hover, true));
        assert!(graph.is_under_scope(focus, plain, false));
    }

    #[test]
    fn at_rule_candidates_require_same_context() {
        let sheet = sheet("@media print { :root { --x: 1 } } .a { w: 1 } @media print { .a { w: 2 } }");
        let graph = ScopeGraph::new(&sheet);
        let print_root = scope_of(&sheet, 0);

        assert!(!graph.is_under_scope(scope_of(&sheet, 1), print_root, false));
        assert!(graph.is_under_scope(scope_of(&sheet, 2), print_root, false));
    }

    #[test]
    fn find_ancestor_skips_root() {
        let sheet = sheet("@media print { .a { .b { --x: 1 } } }");
        let graph = ScopeGraph::new(&sheet);
        let b = scope_of(&sheet, 0);

        let found = graph.find_ancestor_with_selector("@media print", b).unwrap();
        assert_eq!(
            sheet.scope(graph.origin(found)).at_rule_text().as_deref(),
            Some("@media print")
        );
        assert_eq!(graph.find_ancestor_with_selector(".b", b), Some(b));
        assert_eq!(graph.find_ancestor_with_selector(".missing", b), None);
    }
}
