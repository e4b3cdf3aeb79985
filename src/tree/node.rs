use derive_more::{Display, IsVariant};

/// Whether a node is a folder or a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum NodeKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

/// Child lists of a directory node.
///
/// `direct` always lists every real directory level. `collapsed` is only present
/// when flattening replaces at least one child with a flattened id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeChildren {
    pub direct: Vec<String>,
    pub collapsed: Option<Vec<String>>,
}

impl NodeChildren {
    pub fn new(direct: Vec<String>) -> Self {
        Self {
            direct,
            collapsed: None,
        }
    }

    /// The child ids shown for the given flattening mode.
    pub fn visible(&self, flatten: bool) -> &[String] {
        match (&self.collapsed, flatten) {
            (Some(collapsed), true) => collapsed,
            _ => &self.direct,
        }
    }
}

/// One entry of the tree map, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    /// Path of the node. Flattened nodes carry the path of their chain endpoint,
    /// the root carries an empty path.
    pub path: String,
    pub children: Option<NodeChildren>,
    /// Real directory ids absorbed by a flattened node, chain start first.
    pub collapses: Option<Vec<String>>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: None,
            collapses: None,
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>, direct: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            children: Some(NodeChildren::new(direct)),
            collapses: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.children.is_some() {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind().is_directory()
    }

    pub fn is_flattened(&self) -> bool {
        self.collapses.is_some()
    }

    pub fn visible_children(&self, flatten: bool) -> &[String] {
        self.children
            .as_ref()
            .map(|children| children.visible(flatten))
            .unwrap_or_default()
    }
}
