//! Internal node model for the trie.
//!
//! Nodes live in a [`Slab`] arena owned by the `Trie`. Every relation between
//! nodes (parent, children) is a [`NodeId`] into that arena, so reallocating
//! the arena or reordering a child list never invalidates a link, and a clone
//! of the arena is a complete, independent tree.

use slab::Slab;

/// The arena all nodes of one trie are stored in.
pub(crate) type Arena<P, V> = Slab<TrieNode<P, V>>;

/// Index of a node inside its trie's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// One node of the trie.
#[derive(Debug, Clone)]
pub(crate) struct TrieNode<P, V> {
    /// Piece labelling the edge from the parent; `None` only for the root
    pub piece: Option<P>,

    /// Present iff this node terminates a stored key
    pub value: Option<V>,

    /// Child node ids, sorted by piece under the trie's order, pieces unique
    pub children: Vec<NodeId>,

    /// Owning node, `None` for the root
    pub parent: Option<NodeId>,
}

impl<P, V> TrieNode<P, V> {
    /// Creates the root node.
    pub fn root() -> Self {
        TrieNode {
            piece: None,
            value: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Creates a path-only node below `parent`.
    pub fn new(piece: P, parent: NodeId) -> Self {
        TrieNode {
            piece: Some(piece),
            value: None,
            children: Vec::new(),
            parent: Some(parent),
        }
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns whether this node carries a value.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// A node with neither a value nor children backs no key and can be pruned.
    pub fn is_prunable(&self) -> bool {
        self.value.is_none() && self.is_leaf()
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.children.first().copied()
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }
}

/// Returns the node stored under `id`.
///
/// Ids handed around inside the crate always refer to live nodes.
#[inline]
pub(crate) fn node<P, V>(arena: &Arena<P, V>, id: NodeId) -> &TrieNode<P, V> {
    &arena[id.0]
}

#[inline]
pub(crate) fn node_mut<P, V>(arena: &mut Arena<P, V>, id: NodeId) -> &mut TrieNode<P, V> {
    &mut arena[id.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_node() {
        let node: TrieNode<char, u32> = TrieNode::root();

        assert!(node.piece.is_none());
        assert!(node.parent.is_none());
        assert!(!node.has_value());
        assert!(node.is_leaf());
        assert!(node.is_prunable());
    }

    #[test]
    fn test_path_node() {
        let node: TrieNode<char, u32> = TrieNode::new('g', NodeId(0));

        assert_eq!(node.piece, Some('g'));
        assert_eq!(node.parent, Some(NodeId(0)));
        assert!(node.is_prunable());
    }

    #[test]
    fn test_prunable() {
        let mut node: TrieNode<char, u32> = TrieNode::new('g', NodeId(0));
        node.value = Some(42);
        assert!(!node.is_prunable());

        node.value = None;
        node.children.push(NodeId(3));
        assert!(!node.is_prunable());
        assert_eq!(node.first_child(), Some(NodeId(3)));
        assert_eq!(node.last_child(), Some(NodeId(3)));
    }

    #[test]
    fn test_arena_clone_keeps_links() {
        let mut arena: Arena<char, u32> = Slab::new();
        let root = NodeId(arena.insert(TrieNode::root()));
        let child = NodeId(arena.insert(TrieNode::new('a', root)));
        node_mut(&mut arena, root).children.push(child);

        let mut copy = arena.clone();
        node_mut(&mut copy, child).value = Some(7);

        assert_eq!(node(&copy, child).parent, Some(root));
        assert_eq!(node(&copy, root).children, vec![child]);
        assert_eq!(node(&arena, child).value, None);
    }
}
