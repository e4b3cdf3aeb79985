use std::collections::HashSet;

use hashlink::{LinkedHashMap, LinkedHashSet};
use snafu::{Snafu, ensure};
use tracing::{debug, warn};

use crate::ext::{FLATTENED_PREFIX, PATH_SEPARATOR, TreePathExt, flattened_id, parent_path, path_name};
use crate::tree::chain_resolver::{Chain, ChainResolver};
use crate::tree::node::TreeNode;

pub const DEFAULT_ROOT_ID: &str = "root";
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Tree map built from a flat list of paths, keyed by node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    root_id: String,
    nodes: LinkedHashMap<String, TreeNode>,
}

impl PathTree {
    /// Builds a tree with the default root, skipping paths that cannot be represented.
    pub fn build<S: AsRef<str>>(paths: &[S]) -> Self {
        PathTreeBuilder::new().build(paths)
    }

    /// Builds a tree with the default root, failing on the first invalid path.
    pub fn try_build<S: AsRef<str>>(paths: &[S]) -> Result<Self, TreeBuildError> {
        PathTreeBuilder::new().try_build(paths)
    }

    pub fn builder() -> PathTreeBuilder {
        PathTreeBuilder::new()
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.nodes.iter()
    }

    /// Number of nodes, including the root and flattened nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root()
            .map(|root| root.visible_children(false).is_empty())
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone)]
pub struct PathTreeBuilder {
    root_id: String,
    root_name: String,
}

impl Default for PathTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTreeBuilder {
    pub fn new() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }

    pub fn root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }

    /// Builds the tree, logging and skipping every path that fails validation.
    pub fn build<S: AsRef<str>>(&self, paths: &[S]) -> PathTree {
        let mut adjacency = Adjacency::new(&self.root_id);
        for path in paths {
            let path = path.as_ref();
            match self.validate(path) {
                Ok(()) => adjacency.insert(path, &self.root_id),
                Err(error) => warn!("Skipping path '{}': {}", path, error),
            }
        }
        self.assemble(adjacency)
    }

    /// Builds the tree, failing on the first path that fails validation.
    pub fn try_build<S: AsRef<str>>(&self, paths: &[S]) -> Result<PathTree, TreeBuildError> {
        let mut adjacency = Adjacency::new(&self.root_id);
        for path in paths {
            let path = path.as_ref();
            self.validate(path)?;
            adjacency.insert(path, &self.root_id);
        }
        Ok(self.assemble(adjacency))
    }

    fn validate(&self, path: &str) -> Result<(), TreeBuildError> {
        ensure!(
            !path.split(PATH_SEPARATOR).any(str::is_empty),
            EmptySegmentSnafu { path }
        );
        ensure!(
            !path.starts_with(FLATTENED_PREFIX),
            ReservedPrefixSnafu {
                path,
                prefix: FLATTENED_PREFIX,
            }
        );
        let top_level = path.split(PATH_SEPARATOR).next().unwrap_or(path);
        ensure!(
            top_level != self.root_id,
            RootIdCollisionSnafu {
                path,
                root_id: self.root_id.clone(),
            }
        );
        Ok(())
    }

    fn assemble(&self, adjacency: Adjacency) -> PathTree {
        let Adjacency {
            children,
            directories,
            entries,
        } = adjacency;

        let mut nodes = LinkedHashMap::new();
        nodes.insert(
            self.root_id.clone(),
            TreeNode::directory(
                self.root_name.clone(),
                String::new(),
                direct_children(&children, &self.root_id),
            ),
        );
        for path in &entries {
            let node = if directories.contains(path) {
                TreeNode::directory(path_name(path), path.clone(), direct_children(&children, path))
            } else {
                TreeNode::file(path_name(path), path.clone())
            };
            nodes.insert(path.clone(), node);
        }

        let chains = resolve_collapsed_children(&self.root_id, &children, &directories, &mut nodes);
        let flattened_count = chains.len();
        for chain in chains {
            let endpoint_children = nodes
                .get(chain.endpoint())
                .and_then(|endpoint| endpoint.children.clone())
                .unwrap_or_default();
            nodes.insert(
                flattened_id(chain.endpoint()),
                TreeNode {
                    name: chain.name.clone(),
                    path: chain.endpoint().to_string(),
                    children: Some(endpoint_children),
                    collapses: Some(chain.members),
                },
            );
        }

        debug!(
            "Built tree with {} entries ({} directories, {} flattened chains)",
            entries.len(),
            directories.len(),
            flattened_count
        );

        PathTree {
            root_id: self.root_id.clone(),
            nodes,
        }
    }
}

/// Parent to children sets gathered while reading the input paths.
struct Adjacency {
    children: LinkedHashMap<String, LinkedHashSet<String>>,
    directories: HashSet<String>,
    entries: LinkedHashSet<String>,
}

impl Adjacency {
    fn new(root_id: &str) -> Self {
        let mut children = LinkedHashMap::new();
        children.insert(root_id.to_string(), LinkedHashSet::new());
        Self {
            children,
            directories: HashSet::new(),
            entries: LinkedHashSet::new(),
        }
    }

    /// Records `path` and every directory it implies. Re-inserting a path is a no-op.
    fn insert(&mut self, path: &str, root_id: &str) {
        for prefix in path.prefixes() {
            let parent = parent_path(prefix).unwrap_or(root_id);
            self.children
                .entry(parent.to_string())
                .or_insert_with(LinkedHashSet::new)
                .insert(prefix.to_string());
            if prefix.len() < path.len() {
                self.directories.insert(prefix.to_string());
            }
            self.entries.insert(prefix.to_string());
        }
    }
}

fn direct_children(children: &LinkedHashMap<String, LinkedHashSet<String>>, id: &str) -> Vec<String> {
    children
        .get(id)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

/// Walks the visible directories top-down and fills in `collapsed` child lists.
///
/// Returns the chains that need a flattened node. Interior chain members are never
/// walked, so only maximal chains are produced.
fn resolve_collapsed_children(
    root_id: &str,
    children: &LinkedHashMap<String, LinkedHashSet<String>>,
    directories: &HashSet<String>,
    nodes: &mut LinkedHashMap<String, TreeNode>,
) -> Vec<Chain> {
    let mut resolver = ChainResolver::new(children, directories);
    let mut chains = Vec::new();
    let mut pending = vec![root_id.to_string()];

    while let Some(parent) = pending.pop() {
        let direct = direct_children(children, &parent);
        let mut collapsed = Vec::with_capacity(direct.len());

        for child in &direct {
            if !directories.contains(child) {
                collapsed.push(child.clone());
                continue;
            }
            match resolver.chain(child) {
                Some(chain) => {
                    collapsed.push(flattened_id(chain.endpoint()));
                    pending.push(chain.endpoint().to_string());
                    chains.push(chain);
                }
                None => {
                    collapsed.push(child.clone());
                    pending.push(child.clone());
                }
            }
        }

        if collapsed != direct {
            if let Some(node_children) = nodes.get_mut(&parent).and_then(|node| node.children.as_mut()) {
                node_children.collapsed = Some(collapsed);
            }
        }
    }

    chains
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display("Path '{}' contains an empty segment", path))]
    EmptySegment { path: String },
    #[snafu(display("Path '{}' starts with the reserved prefix '{}'", path, prefix))]
    ReservedPrefix { path: String, prefix: String },
    #[snafu(display("Path '{}' collides with the root id '{}'", path, root_id))]
    RootIdCollision { path: String, root_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use rstest::*;

    fn sorted(ids: &[String]) -> Vec<&str> {
        let mut ids = ids.iter().map(String::as_str).collect::<Vec<_>>();
        ids.sort();
        ids
    }

    #[test]
    fn builds_directories_for_every_prefix() {
        let tree = PathTree::build(&["src/components/Button.tsx", "src/components/Card.tsx"]);

        let src = tree.get("src").expect("src should exist");
        assert_eq!(src.kind(), NodeKind::Directory);
        assert_eq!(src.name, "src");
        assert_eq!(src.visible_children(false), ["src/components"]);

        let components = tree.get("src/components").expect("components should exist");
        assert_eq!(
            sorted(components.visible_children(false)),
            vec!["src/components/Button.tsx", "src/components/Card.tsx"]
        );

        let button = tree.get("src/components/Button.tsx").expect("file should exist");
        assert_eq!(button.kind(), NodeKind::File);
        assert_eq!(button.name, "Button.tsx");
        assert!(button.children.is_none());
    }

    #[test]
    fn root_lists_top_level_entries() {
        let tree = PathTree::build(&["README.md", "src/lib.rs", "src/main.rs"]);
        let root = tree.root().expect("root should exist");

        assert_eq!(tree.root_id(), DEFAULT_ROOT_ID);
        assert_eq!(root.name, DEFAULT_ROOT_NAME);
        assert_eq!(root.path, "");
        assert_eq!(sorted(root.visible_children(false)), vec!["README.md", "src"]);
    }

    #[test]
    fn duplicate_paths_are_idempotent() {
        let once = PathTree::build(&["a/b.txt", "a/c.txt"]);
        let twice = PathTree::build(&["a/b.txt", "a/c.txt", "a/b.txt", "a/c.txt"]);

        assert_eq!(once, twice);
        assert_eq!(twice.get("a").map(|node| node.visible_children(false).len()), Some(2));
    }

    #[test]
    fn flattens_two_hop_chain_into_one_node() {
        let tree = PathTree::build(&["a/b/c/file.txt"]);
        let flattened = tree.get("f::a/b/c").expect("flattened node should exist");

        assert_eq!(flattened.name, "a/b/c");
        assert_eq!(flattened.path, "a/b/c");
        assert_eq!(
            flattened.collapses.as_deref(),
            Some(&["a".to_string(), "a/b".to_string(), "a/b/c".to_string()][..])
        );
        assert_eq!(flattened.visible_children(true), ["a/b/c/file.txt"]);

        let root = tree.root().expect("root should exist");
        assert_eq!(root.visible_children(false), ["a"]);
        assert_eq!(root.visible_children(true), ["f::a/b/c"]);
    }

    #[test]
    fn single_hop_is_not_flattened() {
        let tree = PathTree::build(&["src/components/Button.tsx", "src/components/Card.tsx"]);

        assert!(!tree.nodes().any(|(_, node)| node.is_flattened()));
        let root = tree.root().expect("root should exist");
        assert!(root.children.as_ref().is_some_and(|c| c.collapsed.is_none()));
    }

    #[test]
    fn collapsed_list_only_emitted_when_it_differs() {
        let tree = PathTree::build(&["pkg/readme.md", "pkg/x/y/z/lib.rs"]);

        let pkg = tree.get("pkg").expect("pkg should exist");
        let pkg_children = pkg.children.as_ref().expect("pkg is a directory");
        assert_eq!(sorted(&pkg_children.direct), vec!["pkg/readme.md", "pkg/x"]);
        assert_eq!(
            pkg_children.collapsed.as_deref().map(sorted),
            Some(vec!["f::pkg/x/y/z", "pkg/readme.md"])
        );

        let root = tree.root().expect("root should exist");
        assert!(root.children.as_ref().is_some_and(|c| c.collapsed.is_none()));
        assert_eq!(tree.get("f::pkg/x/y/z").map(|n| n.name.as_str()), Some("x/y/z"));
    }

    #[test]
    fn only_maximal_chains_are_synthesized() {
        let tree = PathTree::build(&["a/b/c/d/e.txt"]);
        let flattened = tree
            .nodes()
            .filter(|(_, node)| node.is_flattened())
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>();

        assert_eq!(flattened, vec!["f::a/b/c/d"]);
        assert_eq!(tree.get("f::a/b/c/d").map(|n| n.name.as_str()), Some("a/b/c/d"));
    }

    #[test]
    fn chain_endpoint_children_are_resolved_too() {
        let tree = PathTree::build(&["a/b/c/x/y/z/one.txt", "a/b/c/two.txt"]);

        let endpoint = tree.get("f::a/b/c").expect("outer chain should exist");
        assert_eq!(
            sorted(endpoint.visible_children(true)),
            vec!["a/b/c/two.txt", "f::a/b/c/x/y/z"]
        );
        assert_eq!(tree.get("f::a/b/c/x/y/z").map(|n| n.name.as_str()), Some("x/y/z"));
    }

    #[test]
    fn file_promoted_to_directory_when_it_has_children() {
        let tree = PathTree::build(&["docs", "docs/intro.md"]);

        assert_eq!(tree.get("docs").map(TreeNode::kind), Some(NodeKind::Directory));
    }

    #[test]
    fn custom_root_id_and_name() {
        let tree = PathTree::builder()
            .root_id("__tree_root__")
            .root_name("project")
            .build(&["root/file.txt"]);

        assert_eq!(tree.root_id(), "__tree_root__");
        assert_eq!(tree.root().map(|n| n.name.as_str()), Some("project"));
        assert!(tree.contains("root/file.txt"));
    }

    #[test]
    fn empty_input_builds_an_empty_root() {
        let paths: [&str; 0] = [];
        let tree = PathTree::build(&paths);

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    #[case("/leading.txt")]
    #[case("trailing/")]
    #[case("double//slash.txt")]
    #[case("f::a/b")]
    #[case("root/file.txt")]
    fn lenient_build_skips_invalid_paths(#[case] invalid: &str) {
        let tree = PathTree::build(&[invalid, "ok/file.txt"]);

        assert!(tree.contains("ok/file.txt"));
        assert_eq!(tree.root().map(|n| n.visible_children(false).len()), Some(1));
    }

    #[test]
    fn strict_build_rejects_empty_segments() {
        let result = PathTree::try_build(&["a//b.txt"]);
        assert!(matches!(result, Err(TreeBuildError::EmptySegment { .. })));
    }

    #[test]
    fn strict_build_rejects_reserved_prefix() {
        let result = PathTree::try_build(&["ok.txt", "f::a/b/c"]);
        assert!(matches!(result, Err(TreeBuildError::ReservedPrefix { .. })));
    }

    #[test]
    fn strict_build_rejects_root_id_collision() {
        let result = PathTree::try_build(&["root/config.json"]);
        assert!(matches!(result, Err(TreeBuildError::RootIdCollision { .. })));
    }

    #[test]
    fn build_error_display() {
        let error = TreeBuildError::ReservedPrefix {
            path: "f::x".to_string(),
            prefix: FLATTENED_PREFIX.to_string(),
        };
        assert!(error.to_string().contains("reserved prefix 'f::'"));
    }
}
