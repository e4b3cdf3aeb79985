use std::collections::HashSet;

/// Prefix reserved for ids of synthesized (flattened) directory nodes.
pub const FLATTENED_PREFIX: &str = "f::";

pub const PATH_SEPARATOR: char = '/';

/// Builds the flattened id that stands for the chain ending at `endpoint`.
pub fn flattened_id(endpoint: &str) -> String {
    format!("{FLATTENED_PREFIX}{endpoint}")
}

pub fn is_flattened_id(id: &str) -> bool {
    id.starts_with(FLATTENED_PREFIX)
}

/// Returns the path part of a flattened id, or `None` for a regular id.
pub fn strip_flattened_prefix(id: &str) -> Option<&str> {
    id.strip_prefix(FLATTENED_PREFIX)
}

/// Iterates over every prefix of `path`, shallowest first, ending with the path itself.
///
/// `"a/b/c"` yields `"a"`, `"a/b"`, `"a/b/c"`. An empty path yields nothing.
pub fn path_prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(PATH_SEPARATOR)
        .map(move |(index, _)| &path[..index])
        .chain(std::iter::once(path))
        .filter(|prefix| !prefix.is_empty())
}

/// Number of segments in `path`.
pub fn path_depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.matches(PATH_SEPARATOR).count() + 1
    }
}

/// Returns the last segment of `path`.
pub fn path_name(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// Returns the path of the parent directory, `None` for top-level entries.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(PATH_SEPARATOR).map(|index| &path[..index])
}

/// Lists every input path together with all of its implied parent directories.
///
/// The result is deduplicated and ordered shallow to deep, then lexically.
pub fn expand_implicit_parent_directories<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut all = paths
        .iter()
        .flat_map(|path| path_prefixes(path.as_ref()))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    all.sort_by(|left, right| {
        path_depth(left)
            .cmp(&path_depth(right))
            .then_with(|| left.cmp(right))
    });

    all.into_iter().map(str::to_string).collect()
}

pub trait TreePathExt {
    fn prefixes(&self) -> impl Iterator<Item = &str>;
    fn depth(&self) -> usize;
}

impl TreePathExt for str {
    fn prefixes(&self) -> impl Iterator<Item = &str> {
        path_prefixes(self)
    }

    fn depth(&self) -> usize {
        path_depth(self)
    }
}

impl TreePathExt for String {
    fn prefixes(&self) -> impl Iterator<Item = &str> {
        path_prefixes(self)
    }

    fn depth(&self) -> usize {
        path_depth(self)
    }
}
