//! Internal/external dependency classification.
use crate::manifest::DependencyMap;
use serde::Serialize;

/// A disjoint, exhaustive partition of a dependency map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyGroups {
    /// Produced inside the workspace; copied from prebuilt output.
    pub internal: DependencyMap,
    /// Resolved from the public registry by the package manager.
    pub external: DependencyMap,
}

/// Partition `dependencies` by whether each name starts with `scope_prefix`.
///
/// Versions are copied verbatim.
pub fn split_dependencies(dependencies: &DependencyMap, scope_prefix: &str) -> DependencyGroups {
    let mut groups = DependencyGroups::default();
    for (name, version) in dependencies {
        let group = if is_internal(name, scope_prefix) {
            &mut groups.internal
        } else {
            &mut groups.external
        };
        group.insert(name.clone(), version.clone());
    }
    groups
}

/// Whether `name` belongs to the workspace scope.
pub fn is_internal(name: &str, scope_prefix: &str) -> bool {
    name.starts_with(scope_prefix)
}
