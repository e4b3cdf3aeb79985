use std::collections::HashSet;

use crate::tree::builder::PathTree;
use crate::tree::node::{NodeKind, TreeNode};

/// A row of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub id: String,
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub kind: NodeKind,
    pub is_expanded: bool,
}

impl PathTree {
    /// Lists the rows a renderer shows, depth first.
    ///
    /// Only directories for which `is_expanded` returns true are descended into.
    /// Siblings are ordered directories first, then by name.
    pub fn visible_items(&self, is_expanded: impl Fn(&str) -> bool, flatten: bool) -> Vec<TreeItem> {
        let mut items = Vec::new();
        let Some(root) = self.root() else {
            return items;
        };

        let mut pending = self
            .sorted_children(root, flatten)
            .into_iter()
            .rev()
            .map(|id| (id, 0))
            .collect::<Vec<_>>();

        while let Some((id, depth)) = pending.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let expanded = node.is_directory() && is_expanded(id);
            items.push(TreeItem {
                id: id.to_string(),
                path: node.path.clone(),
                name: node.name.clone(),
                depth,
                kind: node.kind(),
                is_expanded: expanded,
            });
            if expanded {
                pending.extend(
                    self.sorted_children(node, flatten)
                        .into_iter()
                        .rev()
                        .map(|child| (child, depth + 1)),
                );
            }
        }

        items
    }

    /// Every id that can appear as a row in the given mode, regardless of expansion.
    ///
    /// Interior directories of flattened chains are absent when `flatten` is on.
    pub fn visible_ids(&self, flatten: bool) -> HashSet<String> {
        let mut visible = HashSet::new();
        let mut pending = self
            .root()
            .map(|root| root.visible_children(flatten).iter().collect::<Vec<_>>())
            .unwrap_or_default();

        while let Some(id) = pending.pop() {
            if !visible.insert(id.clone()) {
                continue;
            }
            if let Some(node) = self.get(id) {
                pending.extend(node.visible_children(flatten));
            }
        }

        visible
    }

    fn sorted_children<'t>(&'t self, node: &'t TreeNode, flatten: bool) -> Vec<&'t str> {
        let mut children = node
            .visible_children(flatten)
            .iter()
            .filter_map(|id| self.get(id).map(|child| (id.as_str(), child)))
            .collect::<Vec<_>>();
        children.sort_by(|(_, left), (_, right)| {
            right
                .is_directory()
                .cmp(&left.is_directory())
                .then_with(|| left.name.to_lowercase().cmp(&right.name.to_lowercase()))
                .then_with(|| left.name.cmp(&right.name))
        });
        children.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(items: &[TreeItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| format!("{}{}", "  ".repeat(item.depth), item.name))
            .collect()
    }

    #[test]
    fn collapsed_tree_shows_only_top_level() {
        let tree = PathTree::build(&["src/lib.rs", "Cargo.toml", "README.md"]);
        let items = tree.visible_items(|_| false, false);

        assert_eq!(rows(&items), vec!["src", "Cargo.toml", "README.md"]);
        assert!(items.iter().all(|item| !item.is_expanded));
    }

    #[test]
    fn expanded_directories_show_their_children() {
        let tree = PathTree::build(&["src/lib.rs", "src/tree/mod.rs", "Cargo.toml"]);
        let expanded = ["src", "src/tree"];
        let items = tree.visible_items(|id| expanded.contains(&id), false);

        assert_eq!(
            rows(&items),
            vec!["src", "  tree", "    mod.rs", "  lib.rs", "Cargo.toml"]
        );
        assert_eq!(items[0].kind, NodeKind::Directory);
        assert!(items[0].is_expanded);
        assert_eq!(items[2].path, "src/tree/mod.rs");
    }

    #[test]
    fn flatten_mode_renders_chain_as_one_row() {
        let tree = PathTree::build(&["a/b/c/file.txt"]);

        let flat = tree.visible_items(|id| id == "f::a/b/c", true);
        assert_eq!(rows(&flat), vec!["a/b/c", "  file.txt"]);
        assert_eq!(flat[0].id, "f::a/b/c");
        assert_eq!(flat[0].path, "a/b/c");

        let full = tree.visible_items(|_| true, false);
        assert_eq!(rows(&full), vec!["a", "  b", "    c", "      file.txt"]);
    }

    #[test]
    fn interior_directories_are_not_visible_when_flattening() {
        let tree = PathTree::build(&["a/b/c/file.txt"]);
        let flattened = tree.visible_ids(true);

        assert!(flattened.contains("f::a/b/c"));
        assert!(!flattened.contains("a"));
        assert!(!flattened.contains("a/b"));

        let regular = tree.visible_ids(false);
        assert!(regular.contains("a"));
        assert!(regular.contains("a/b"));
        assert!(!regular.contains("f::a/b/c"));
    }

    #[test]
    fn files_are_never_marked_expanded() {
        let tree = PathTree::build(&["notes.txt"]);
        let items = tree.visible_items(|_| true, false);

        assert_eq!(items.len(), 1);
        assert!(!items[0].is_expanded);
    }
}
