//! Circular and self-referencing variable detection.

use std::collections::HashSet;

use crate::var_map::VarMap;

/// Whether following the dependencies of `names` through `vars` leads back
/// to any name in `names`.
///
/// Every declaration of a name contributes its references, regardless of
/// scope, so two unrelated names referencing each other's declarations count
/// as a cycle.
pub fn has_circular_or_self_reference<S: AsRef<str>>(names: &[S], vars: &VarMap) -> bool {
    let origin: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();

    names.iter().any(|name| {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = vars.dependencies_of(name.as_ref()).collect();

        while let Some(next) = pending.pop() {
            if origin.contains(next) {
                return true;
            }
            if seen.insert(next) {
                pending.extend(vars.dependencies_of(next));
            }
        }
        false
    })
}
