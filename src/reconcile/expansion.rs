use std::collections::HashMap;

use hashlink::LinkedHashSet;

use crate::ext::{TreePathExt, parent_path, strip_flattened_prefix};
use crate::identifiers::IdentifierMaps;

/// Memoized ancestor ids keyed by the literal input path and the mode.
///
/// Only valid for the identifier maps it was filled against; reset it when the
/// maps are rebuilt.
#[derive(Debug, Clone, Default)]
pub struct ExpansionCache {
    ids_by_path: HashMap<(String, bool), Vec<String>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ids_by_path.clear();
    }

    pub fn len(&self) -> usize {
        self.ids_by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_path.is_empty()
    }
}

/// Ids of every directory needed to show each of `paths` opened.
///
/// Unknown prefixes are skipped. Files contribute no id.
pub fn expand_with_ancestors<S: AsRef<str>>(
    paths: &[S],
    maps: &IdentifierMaps,
    flatten: bool,
) -> Vec<String> {
    expand_with_ancestors_cached(paths, maps, flatten, &mut ExpansionCache::new())
}

pub fn expand_with_ancestors_cached<S: AsRef<str>>(
    paths: &[S],
    maps: &IdentifierMaps,
    flatten: bool,
    cache: &mut ExpansionCache,
) -> Vec<String> {
    let mut ids = LinkedHashSet::new();
    for path in paths {
        let path = path.as_ref();
        let path_ids = cache
            .ids_by_path
            .entry((path.to_string(), flatten))
            .or_insert_with(|| ancestor_ids(path, maps, flatten));
        ids.extend(path_ids.iter().cloned());
    }
    ids.into_iter().collect()
}

fn ancestor_ids(path: &str, maps: &IdentifierMaps, flatten: bool) -> Vec<String> {
    let directory_id = |id: &str| maps.is_directory_id(id).then(|| id.to_string());

    match strip_flattened_prefix(path) {
        Some(unprefixed) => {
            let mut ids = parent_path(unprefixed)
                .map(|parent| {
                    parent
                        .prefixes()
                        .filter_map(|prefix| maps.resolve_id(prefix, flatten))
                        .filter_map(directory_id)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            ids.extend(maps.id_for_path(path).and_then(directory_id));
            ids
        }
        None => path
            .prefixes()
            .filter_map(|prefix| maps.resolve_id(prefix, flatten))
            .filter_map(directory_id)
            .collect(),
    }
}
