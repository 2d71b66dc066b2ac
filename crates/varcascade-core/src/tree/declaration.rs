//! Property/value declarations.

use std::cell::OnceCell;

use super::ScopeId;

/// A `property: value` pair owned by exactly one scope.
///
/// The resolved-value cache is write-once: the first fully resolved value is
/// kept and later resolutions reuse it.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub(crate) property: String,
    pub(crate) value: String,
    pub(crate) important: bool,
    pub(crate) parent: ScopeId,
    pub(crate) resolved: OnceCell<String>,
}

impl Declaration {
    pub(crate) fn new(
        property: impl Into<String>,
        value: impl Into<String>,
        important: bool,
        parent: ScopeId,
    ) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important,
            parent,
            resolved: OnceCell::new(),
        }
    }

    /// The property name, e.g. `--gap` or `width`.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The raw value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the declaration carries `!important`.
    pub fn is_important(&self) -> bool {
        self.important
    }

    /// The owning scope.
    pub fn parent(&self) -> ScopeId {
        self.parent
    }

    /// Whether this declares a custom property.
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }

    /// The cached resolved value, if one was recorded.
    pub fn cached_value(&self) -> Option<&str> {
        self.resolved.get().map(String::as_str)
    }

    /// Record the resolved value. Returns `false` if a value was already cached.
    pub fn cache_value(&self, value: String) -> bool {
        self.resolved.set(value).is_ok()
    }
}
