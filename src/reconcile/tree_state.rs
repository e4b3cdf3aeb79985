use std::collections::HashSet;

use hashlink::LinkedHashSet;
use tracing::debug;

use crate::ext::strip_flattened_prefix;
use crate::identifiers::IdentifierMaps;
use crate::reconcile::expansion::{ExpansionCache, expand_with_ancestors_cached};
use crate::reconcile::orphans::{filter_orphaned, is_orphaned};
use crate::reconcile::state_source::StateSource;
use crate::tree::{DEFAULT_ROOT_ID, DEFAULT_ROOT_NAME, PathTree, PathTreeBuilder, TreeItem};

/// Settings that shape how a path list becomes a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOptions {
    pub flatten_empty_directories: bool,
    pub root_id: String,
    pub root_name: String,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            flatten_empty_directories: false,
            root_id: DEFAULT_ROOT_ID.to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

impl TreeOptions {
    pub fn flattened() -> Self {
        Self {
            flatten_empty_directories: true,
            ..Self::default()
        }
    }

    fn build_tree<S: AsRef<str>>(&self, paths: &[S]) -> PathTree {
        PathTreeBuilder::new()
            .root_id(self.root_id.clone())
            .root_name(self.root_name.clone())
            .build(paths)
    }
}

/// Expand and select state of one tree, exchanged with the outside as paths only.
///
/// Internally the state is a set of ids. Expanded ids below a collapsed directory
/// are kept but never reported, so re-expanding the directory restores its subtree.
#[derive(Debug)]
pub struct TreeState {
    options: TreeOptions,
    tree: PathTree,
    maps: IdentifierMaps,
    expanded_ids: LinkedHashSet<String>,
    selected_ids: LinkedHashSet<String>,
    expanded_source: StateSource,
    selected_source: StateSource,
    expansion_cache: ExpansionCache,
}

impl TreeState {
    pub fn new<S: AsRef<str>>(
        paths: &[S],
        options: TreeOptions,
        expanded_source: StateSource,
        selected_source: StateSource,
    ) -> Self {
        let tree = options.build_tree(paths);
        let maps = IdentifierMaps::from_tree(&tree);
        let mut state = Self {
            options,
            tree,
            maps,
            expanded_ids: LinkedHashSet::new(),
            selected_ids: LinkedHashSet::new(),
            expanded_source,
            selected_source,
            expansion_cache: ExpansionCache::new(),
        };

        let initial_expanded = state.expanded_source.initial().to_vec();
        state.expanded_ids = state.reconcile(&LinkedHashSet::new(), &initial_expanded);
        let initial_selected = state.selected_source.initial().to_vec();
        state.selected_ids = state.resolve_selection(&initial_selected);

        debug!(
            "Created tree state: {} expanded ids, {} selected ids, flatten={}",
            state.expanded_ids.len(),
            state.selected_ids.len(),
            state.flatten()
        );
        state
    }

    /// Tree state that owns both slices, starting with nothing expanded or selected.
    pub fn uncontrolled<S: AsRef<str>>(paths: &[S], options: TreeOptions) -> Self {
        Self::new(paths, options, StateSource::default(), StateSource::default())
    }

    pub fn flatten(&self) -> bool {
        self.options.flatten_empty_directories
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub fn maps(&self) -> &IdentifierMaps {
        &self.maps
    }

    /// Replaces the path list. The tree and identifier maps are rebuilt and the
    /// current state is carried over for paths that still exist.
    pub fn set_paths<S: AsRef<str>>(&mut self, paths: &[S]) {
        let logical_expanded = self.logical_expanded_paths();
        let selected = self.selected_items();
        let before_expanded = self.expanded_items();

        self.tree = self.options.build_tree(paths);
        self.maps = IdentifierMaps::from_tree(&self.tree);
        self.expansion_cache.clear();

        self.expanded_ids = self.ids_for_logical_paths(&logical_expanded);
        self.selected_ids = self.resolve_selection(&selected);

        let after_expanded = self.expanded_items();
        if after_expanded != before_expanded {
            self.expanded_source.notify(&after_expanded);
        }
        let after_selected = self.selected_items();
        if after_selected != selected {
            self.selected_source.notify(&after_selected);
        }
    }

    /// Externally visible expanded paths. Hidden preserved state is not reported.
    pub fn expanded_items(&self) -> Vec<String> {
        let paths = self.paths_of(&self.expanded_ids);
        filter_orphaned(&paths, &self.maps, self.flatten())
    }

    pub fn set_expanded_items<S: AsRef<str>>(&mut self, paths: &[S]) {
        let current = self.expanded_ids.clone();
        self.apply_expanded(&current, paths);
    }

    /// Opens `path` and its ancestors. Hidden expanded descendants become visible again.
    pub fn expand_item(&mut self, path: &str) {
        let added = expand_with_ancestors_cached(
            &[path],
            &self.maps,
            self.options.flatten_empty_directories,
            &mut self.expansion_cache,
        );
        let mut next = added.into_iter().collect::<LinkedHashSet<_>>();
        for id in &self.expanded_ids {
            if !next.contains(id) {
                next.insert(id.clone());
            }
        }
        self.replace_expanded(next);
    }

    /// Collapses `path` in both its regular and flattened form.
    pub fn collapse_item(&mut self, path: &str) {
        let path = strip_flattened_prefix(path).unwrap_or(path);
        let mut current = self.expanded_ids.clone();
        for id in self.maps.id_forms(path) {
            current.remove(id);
        }
        let remaining = self.paths_of(&current);
        let desired = filter_orphaned(&remaining, &self.maps, self.flatten());
        self.apply_expanded(&current, &desired);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        let path = strip_flattened_prefix(path).unwrap_or(path);
        self.expanded_items().iter().any(|expanded| expanded == path)
    }

    pub fn toggle_expanded(&mut self, path: &str) {
        if self.is_expanded(path) {
            self.collapse_item(path);
        } else {
            self.expand_item(path);
        }
    }

    pub fn selected_items(&self) -> Vec<String> {
        self.paths_of(&self.selected_ids)
    }

    pub fn set_selected_items<S: AsRef<str>>(&mut self, paths: &[S]) {
        let before = self.selected_items();
        self.selected_ids = self.resolve_selection(paths);
        let after = self.selected_items();
        if after != before {
            self.selected_source.notify(&after);
        }
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.maps
            .resolve_id(path, self.flatten())
            .is_some_and(|id| self.selected_ids.contains(id))
    }

    /// Adds `path` to the selection, or removes it if it is already selected.
    pub fn toggle_selected(&mut self, path: &str) {
        let mut selected = self.selected_items();
        if self.is_selected(path) {
            let path = strip_flattened_prefix(path).unwrap_or(path);
            selected.retain(|item| item != path);
        } else {
            selected.push(path.to_string());
        }
        self.set_selected_items(&selected);
    }

    /// Every expanded path including hidden preserved ones, for persisting a session.
    pub fn logical_expanded_paths(&self) -> Vec<String> {
        self.paths_of(&self.expanded_ids)
    }

    /// Restores the output of [`TreeState::logical_expanded_paths`] without adding ancestors.
    pub fn restore_logical_expanded<S: AsRef<str>>(&mut self, paths: &[S]) {
        let before = self.expanded_items();
        self.expanded_ids = self.ids_for_logical_paths(paths);
        let after = self.expanded_items();
        if after != before {
            self.expanded_source.notify(&after);
        }
    }

    /// Rows to render for the current expand state.
    pub fn visible_items(&self) -> Vec<TreeItem> {
        self.tree
            .visible_items(|id| self.expanded_ids.contains(id), self.flatten())
    }

    fn apply_expanded<S: AsRef<str>>(&mut self, current: &LinkedHashSet<String>, desired: &[S]) {
        let next = self.reconcile(current, desired);
        self.replace_expanded(next);
    }

    fn replace_expanded(&mut self, next: LinkedHashSet<String>) {
        let before = self.expanded_items();
        self.expanded_ids = next;
        let after = self.expanded_items();
        if after != before {
            debug!("Expanded items changed: {:?}", after);
            self.expanded_source.notify(&after);
        }
    }

    /// Computes the next internal id set for the `desired` visible paths.
    ///
    /// A current id that is not desired survives only if the desired set leaves
    /// its path orphaned, so it stays hidden. Everything else not desired is dropped.
    fn reconcile<S: AsRef<str>>(
        &mut self,
        current: &LinkedHashSet<String>,
        desired: &[S],
    ) -> LinkedHashSet<String> {
        let flatten = self.flatten();
        let desired_set = desired
            .iter()
            .map(|path| {
                let path = path.as_ref();
                strip_flattened_prefix(path).unwrap_or(path)
            })
            .collect::<HashSet<_>>();

        let hidden = current
            .iter()
            .filter_map(|id| self.maps.path_for_id(id).map(|path| (id, path)))
            .filter(|(_, path)| !desired_set.contains(path))
            .filter(|(_, path)| is_orphaned(path, &desired_set, &self.maps, flatten))
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>();

        let mut next = expand_with_ancestors_cached(desired, &self.maps, flatten, &mut self.expansion_cache)
            .into_iter()
            .collect::<LinkedHashSet<_>>();
        next.extend(hidden);
        next
    }

    fn resolve_selection<S: AsRef<str>>(&self, paths: &[S]) -> LinkedHashSet<String> {
        paths
            .iter()
            .filter_map(|path| self.maps.resolve_id(path.as_ref(), self.flatten()))
            .map(str::to_string)
            .collect()
    }

    fn ids_for_logical_paths<S: AsRef<str>>(&self, paths: &[S]) -> LinkedHashSet<String> {
        paths
            .iter()
            .filter_map(|path| self.maps.resolve_id(path.as_ref(), self.flatten()))
            .filter(|id| self.maps.is_directory_id(id))
            .map(str::to_string)
            .collect()
    }

    fn paths_of(&self, ids: &LinkedHashSet<String>) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.maps.path_for_id(id))
            .map(str::to_string)
            .collect::<LinkedHashSet<_>>()
            .into_iter()
            .collect()
    }
}
