//! Relocating a declaration's ancestry under another scope.

use varcascade_core::logging::targets;
use varcascade_core::prelude::*;

use crate::scope::{ScopeGraph, ScopeRef, SplicedId, SplicedScope};

/// A declaration viewed through a spliced parent chain.
///
/// Property, value and importance are those of `origin`; only the scope it
/// hangs under differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplicedDecl {
    /// The declaration this copy stands for.
    pub origin: DeclId,
    /// The rewritten owning scope.
    pub parent: ScopeRef,
}

impl SplicedDecl {
    /// The original declaration.
    pub fn declaration<'s>(&self, sheet: &'s Stylesheet) -> &'s Declaration {
        sheet.declaration(self.origin)
    }
}

impl ScopeGraph<'_> {
    /// Copy the ancestry of `decl` so that it hangs under `new_root`.
    ///
    /// Scopes are copied from the declaration's parent upward, stopping below
    /// the first scope for which `stop` holds: `new_root` takes that scope's
    /// place. Without such a scope the whole chain up to the root is copied.
    pub fn splice_parent_onto(
        &mut self,
        decl: DeclId,
        new_root: ScopeRef,
        stop: impl Fn(ScopeRef) -> bool,
    ) -> SplicedDecl {
        let mut chain = Vec::new();
        let mut current = Some(ScopeRef::Sheet(self.sheet().declaration(decl).parent()));
        while let Some(scope) = current {
            if stop(scope) {
                break;
            }
            chain.push(self.origin(scope));
            current = self.parent(scope);
        }

        tracing::debug!(
            target: targets::SPLICE,
            ?decl,
            copied = chain.len(),
            "spliced declaration ancestry"
        );

        let mut parent = new_root;
        for origin in chain.into_iter().rev() {
            let id = SplicedId(self.spliced.len());
            self.spliced.push(SplicedScope { origin, parent });
            parent = ScopeRef::Spliced(id);
        }

        SplicedDecl { origin: decl, parent }
    }
}
