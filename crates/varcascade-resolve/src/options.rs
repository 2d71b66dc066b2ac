//! Resolution options.

/// Default bound on nested resolution depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling how references are matched to declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Strip pseudo-classes from candidate scopes too, so `.a:hover { --x }`
    /// is visible from `.a`.
    pub ignore_pseudo_scope: bool,
    /// Maximum nesting of fallback and declaration resolution.
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            ignore_pseudo_scope: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolveOptions {
    /// Set [`Self::ignore_pseudo_scope`].
    pub fn with_ignore_pseudo_scope(mut self, ignore: bool) -> Self {
        self.ignore_pseudo_scope = ignore;
        self
    }

    /// Set [`Self::max_depth`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Whether a resolution was requested by a caller or by the resolver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Invocation {
    /// Requested for a declaration of the stylesheet.
    #[default]
    TopLevel,
    /// Resolving a fallback or a matched declaration on behalf of another
    /// resolution.
    Nested {
        /// Distance from the top-level call.
        depth: usize,
    },
}

impl Invocation {
    /// Distance from the top-level call; zero for [`Invocation::TopLevel`].
    pub fn depth(self) -> usize {
        match self {
            Self::TopLevel => 0,
            Self::Nested { depth } => depth,
        }
    }

    /// The invocation for a resolution started from this one.
    pub fn nested(self) -> Self {
        Self::Nested {
            depth: self.depth() + 1,
        }
    }

    /// Whether this is [`Invocation::TopLevel`].
    pub fn is_top_level(self) -> bool {
        matches!(self, Self::TopLevel)
    }
}
