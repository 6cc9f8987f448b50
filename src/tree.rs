//! The shape of a project: folders and files keyed by slash-separated path.
//!
//! [`ProjectTree`] is an arena of [`TreeNode`]s with explicit parent links. Node 0 is a nameless
//! root container; the first path segment names one of its children. Every file path, split on
//! `/`, matches exactly one chain of folders from the root to the file's parent, and inserting a
//! file creates whatever part of that chain is missing.
//!
//! A folder and a file may share a name in the same parent (they are different kinds), but two
//! children of the same kind never do.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    error::LivecodeError,
    language::Language,
    paths::{self, ProjectPath},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    path: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn language(&self) -> Option<Language> {
        match self.kind {
            NodeKind::File => Some(Language::classify(&self.path)),
            NodeKind::Folder => None,
        }
    }
}

/// One row of a depth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    /// 0 for children of the root
    pub depth: usize,
}

/// Nested, serializable copy of the tree for hosts that render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<TreeSnapshot>,
}

#[derive(Debug, Clone)]
pub struct ProjectTree {
    nodes: Vec<TreeNode>,
    folders: HashMap<String, NodeId>,
    files: HashMap<String, NodeId>,
}

impl Default for ProjectTree {
    fn default() -> Self {
        ProjectTree {
            nodes: vec![TreeNode {
                name: String::new(),
                path: String::new(),
                kind: NodeKind::Folder,
                parent: None,
                children: Vec::new(),
            }],
            folders: HashMap::new(),
            files: HashMap::new(),
        }
    }
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file by full path, creating missing ancestor folders. Re-inserting an existing
    /// file returns its id and leaves the tree unchanged.
    pub fn insert(&mut self, full_path: &str) -> Result<NodeId, LivecodeError> {
        let segments: Vec<&str> = ProjectPath::new(full_path).segments().collect();
        let Some((file_name, folders)) = segments.split_last() else {
            return Err(LivecodeError::InvalidPath(full_path.to_string()));
        };
        let mut current = NodeId::ROOT;
        for folder in folders {
            current = self.child_or_insert(current, folder, NodeKind::Folder);
        }
        Ok(self.child_or_insert(current, file_name, NodeKind::File))
    }

    /// Create an empty folder named `name` inside the folder at `parent_dir` ("" for the top
    /// level).
    ///
    /// Fails with [`LivecodeError::AlreadyExists`] if that folder already exists, so a name is
    /// never duplicated.
    pub fn create_folder(&mut self, parent_dir: &str, name: &str) -> Result<NodeId, LivecodeError> {
        let name = name.trim();
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(LivecodeError::InvalidPath(format!(
                "'{name}' is not a valid folder name"
            )));
        }
        let parent_path = paths::normalize(parent_dir);
        let parent = if parent_path.is_empty() {
            NodeId::ROOT
        } else {
            *self
                .folders
                .get(&parent_path)
                .ok_or_else(|| LivecodeError::NotFound(format!("folder '{parent_path}'")))?
        };
        if let Some(existing) = self.child(parent, name, NodeKind::Folder) {
            return Err(LivecodeError::AlreadyExists(
                self.nodes[existing.0].path.clone(),
            ));
        }
        Ok(self.push(parent, name, NodeKind::Folder))
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[NodeId::ROOT.0]
    }

    pub fn find(&self, path: &str, kind: NodeKind) -> Option<NodeId> {
        match kind {
            NodeKind::Folder => self.folders.get(path).copied(),
            NodeKind::File => self.files.get(path).copied(),
        }
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn contains_folder(&self, path: &str) -> bool {
        self.folders.contains_key(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of folders, not counting the root container.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Depth-first listing with folders before files at every level; each group keeps insertion
    /// order.
    pub fn traverse(&self) -> Vec<TreeEntry> {
        let mut entries = Vec::with_capacity(self.nodes.len() - 1);
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        self.push_ordered_children(NodeId::ROOT, 0, &mut stack);
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            entries.push(TreeEntry {
                path: node.path.clone(),
                name: node.name.clone(),
                kind: node.kind,
                depth,
            });
            if node.kind == NodeKind::Folder {
                self.push_ordered_children(id, depth + 1, &mut stack);
            }
        }
        entries
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        self.snapshot_node(NodeId::ROOT)
    }

    fn snapshot_node(&self, id: NodeId) -> TreeSnapshot {
        let node = &self.nodes[id.0];
        TreeSnapshot {
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            children: self
                .ordered_children(id)
                .map(|child| self.snapshot_node(child))
                .collect(),
        }
    }

    fn ordered_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let children = &self.nodes[id.0].children;
        let folders = children
            .iter()
            .filter(|c| self.nodes[c.0].kind == NodeKind::Folder);
        let files = children
            .iter()
            .filter(|c| self.nodes[c.0].kind == NodeKind::File);
        folders.chain(files).copied()
    }

    fn push_ordered_children(&self, id: NodeId, depth: usize, stack: &mut Vec<(NodeId, usize)>) {
        let ordered: Vec<NodeId> = self.ordered_children(id).collect();
        // Reversed so the first child is popped first
        stack.extend(ordered.into_iter().rev().map(|child| (child, depth)));
    }

    fn child(&self, parent: NodeId, name: &str, kind: NodeKind) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].kind == kind && self.nodes[c.0].name == name)
    }

    fn child_or_insert(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        match self.child(parent, name, kind) {
            Some(existing) => existing,
            None => self.push(parent, name, kind),
        }
    }

    fn push(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let path = paths::join(&self.nodes[parent.0].path, name);
        tracing::debug!("[ProjectTree] adding {:?} '{}'", kind, path);
        match kind {
            NodeKind::Folder => self.folders.insert(path.clone(), id),
            NodeKind::File => self.files.insert(path.clone(), id),
        };
        self.nodes.push(TreeNode {
            name: name.to_string(),
            path,
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}
