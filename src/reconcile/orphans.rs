use std::collections::HashSet;

use crate::ext::{TreePathExt, strip_flattened_prefix};
use crate::identifiers::IdentifierMaps;

/// Drops paths whose visible ancestor chain is not fully expanded.
///
/// An ancestor counts only if it is a registered node and, with flattening on,
/// not an interior directory of a flattened chain. Input order is kept and
/// duplicates are removed.
pub fn filter_orphaned<S: AsRef<str>>(paths: &[S], maps: &IdentifierMaps, flatten: bool) -> Vec<String> {
    let expanded = paths.iter().map(|path| unprefixed(path.as_ref())).collect::<HashSet<_>>();
    let mut seen = HashSet::new();

    paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| seen.insert(*path))
        .filter(|path| !is_orphaned(unprefixed(path), &expanded, maps, flatten))
        .map(str::to_string)
        .collect()
}

/// True if some ancestor of `path` that is rendered on its own is missing from `expanded`.
pub fn is_orphaned(path: &str, expanded: &HashSet<&str>, maps: &IdentifierMaps, flatten: bool) -> bool {
    path.prefixes()
        .filter(|ancestor| ancestor.len() < path.len())
        .filter(|ancestor| maps.is_registered(ancestor))
        .filter(|ancestor| !(flatten && maps.is_interior(ancestor)))
        .any(|ancestor| !expanded.contains(&ancestor))
}

fn unprefixed(path: &str) -> &str {
    strip_flattened_prefix(path).unwrap_or(path)
}
