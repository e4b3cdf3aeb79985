use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ext::{flattened_id, is_flattened_id};
use crate::tree::PathTree;

/// Bidirectional path/id lookup for one built tree.
///
/// Regular nodes are keyed by their path. Flattened nodes are keyed by their own
/// id (`f::a/b/c`) and map back to their endpoint path (`a/b/c`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierMaps {
    path_to_id: HashMap<String, String>,
    id_to_path: HashMap<String, String>,
    directory_ids: HashSet<String>,
    interior: HashSet<String>,
}

impl IdentifierMaps {
    /// Walks every node reachable from the root through direct and collapsed children.
    pub fn from_tree(tree: &PathTree) -> Self {
        let mut maps = Self::default();
        let mut pending = tree
            .root()
            .and_then(|root| root.children.as_ref())
            .map(|children| {
                children
                    .direct
                    .iter()
                    .chain(children.collapsed.iter().flatten())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        while let Some(id) = pending.pop() {
            if maps.id_to_path.contains_key(id) {
                continue;
            }
            let Some(node) = tree.get(id) else {
                continue;
            };

            let key = if node.is_flattened() { id } else { &node.path };
            maps.path_to_id.insert(key.clone(), id.clone());
            maps.id_to_path.insert(id.clone(), node.path.clone());

            if let Some(collapses) = &node.collapses {
                let interior = &collapses[..collapses.len().saturating_sub(1)];
                maps.interior.extend(interior.iter().cloned());
            }
            if let Some(children) = &node.children {
                maps.directory_ids.insert(id.clone());
                pending.extend(children.direct.iter().chain(children.collapsed.iter().flatten()));
            }
        }

        debug!(
            "Built identifier maps for {} ids ({} interior directories)",
            maps.id_to_path.len(),
            maps.interior.len()
        );
        maps
    }

    /// Looks up the id registered under `path`, flattened keys included.
    pub fn id_for_path(&self, path: &str) -> Option<&str> {
        self.path_to_id.get(path).map(String::as_str)
    }

    pub fn path_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_path.get(id).map(String::as_str)
    }

    /// The flattened id whose chain ends at `path`, if one is registered.
    pub fn flattened_id_for(&self, path: &str) -> Option<&str> {
        self.id_for_path(&flattened_id(path))
    }

    /// Picks the id that represents `path` in the given mode.
    ///
    /// With flattening on, the flattened id wins over the regular one. A path
    /// already written in flattened form is looked up literally.
    pub fn resolve_id(&self, path: &str, flatten: bool) -> Option<&str> {
        if is_flattened_id(path) {
            return self.id_for_path(path);
        }
        if flatten {
            if let Some(id) = self.flattened_id_for(path) {
                return Some(id);
            }
        }
        self.id_for_path(path)
    }

    /// Both id forms registered for `path`.
    pub fn id_forms(&self, path: &str) -> Vec<&str> {
        [self.id_for_path(path), self.flattened_id_for(path)]
            .into_iter()
            .flatten()
            .collect()
    }

    /// True if `path` names a real node, regular or flattened.
    pub fn is_registered(&self, path: &str) -> bool {
        self.path_to_id.contains_key(path) || self.flattened_id_for(path).is_some()
    }

    pub fn is_directory_id(&self, id: &str) -> bool {
        self.directory_ids.contains(id)
    }

    /// True if `path` is swallowed by a flattened chain and never rendered on its own.
    pub fn is_interior(&self, path: &str) -> bool {
        self.interior.contains(path)
    }

    pub fn path_to_id(&self) -> &HashMap<String, String> {
        &self.path_to_id
    }

    pub fn id_to_path(&self) -> &HashMap<String, String> {
        &self.id_to_path
    }

    pub fn len(&self) -> usize {
        self.id_to_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_path.is_empty()
    }
}

impl From<&PathTree> for IdentifierMaps {
    fn from(tree: &PathTree) -> Self {
        Self::from_tree(tree)
    }
}
