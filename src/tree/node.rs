//! Arena-backed tree nodes
//!
//! Nodes are stored in a flat vector and addressed by `NodeHandle`. A parent
//! holds the handles of exactly two children and every handle has at most one
//! parent, so trees are acyclic by construction and never need recursion to
//! walk.

use crate::tree::hasher;
use crate::types::HexDigest;

/// Index of a node inside its owning `Tree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A leaf or an internal node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    content: String,
    digest: HexDigest,
    children: Option<(NodeHandle, NodeHandle)>,
}

impl TreeNode {
    /// Raw chunk text for leaves, concatenated child digests for internal nodes
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn left(&self) -> Option<NodeHandle> {
        self.children.map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<NodeHandle> {
        self.children.map(|(_, right)| right)
    }

    pub fn children(&self) -> Option<(NodeHandle, NodeHandle)> {
        self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Complete hash tree over one leaf sequence
///
/// Leaves occupy the first `leaf_count` handles, in input order.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: NodeHandle,
    leaf_count: usize,
}

impl Tree {
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root.0]
    }

    pub fn root_handle(&self) -> NodeHandle {
        self.root
    }

    /// Root digest, i.e. the artifact fingerprint
    pub fn root_digest(&self) -> &str {
        &self.root().digest
    }

    pub fn node(&self, handle: NodeHandle) -> &TreeNode {
        &self.nodes[handle.0]
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes[..self.leaf_count].iter()
    }

    /// Every node with its handle, leaves first, then parents in build order
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeHandle(index), node))
    }
}

/// Append-only node storage used while a tree is being built
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<TreeNode>,
}

impl Arena {
    pub(crate) fn with_capacity(leaf_count: usize) -> Self {
        // A binary tree over n leaves has at most 2n - 1 nodes
        Self {
            nodes: Vec::with_capacity(leaf_count.saturating_mul(2)),
        }
    }

    pub(crate) fn push_leaf(&mut self, content: &str) -> NodeHandle {
        let node = TreeNode {
            digest: hasher::digest_hex(content),
            content: content.to_string(),
            children: None,
        };
        self.push(node)
    }

    pub(crate) fn push_parent(&mut self, left: NodeHandle, right: NodeHandle) -> NodeHandle {
        let content = hasher::parent_content(&self.nodes[left.0].digest, &self.nodes[right.0].digest);
        let node = TreeNode {
            digest: hasher::digest_hex(&content),
            content,
            children: Some((left, right)),
        };
        self.push(node)
    }

    pub(crate) fn get(&self, handle: NodeHandle) -> &TreeNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn into_tree(self, root: NodeHandle, leaf_count: usize) -> Tree {
        Tree {
            nodes: self.nodes,
            root,
            leaf_count,
        }
    }

    fn push(&mut self, node: TreeNode) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(node);
        handle
    }
}
