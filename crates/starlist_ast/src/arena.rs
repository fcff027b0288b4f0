//! Arena-backed document tree.
//!
//! All nodes of one document live in a single `Vec` and refer to each other
//! by [`NodeId`]. Parent and sibling relations are indices, never pointers,
//! so mutation never fights the borrow checker and detached nodes simply
//! become unreachable until the tree is dropped.

use crate::walk::{Ancestors, Descendants};
use crate::{Node, NodeId, NodeType, Span};

/// A parsed document, owned as an arena of nodes.
///
/// # Example
///
/// ```rust
/// use starlist_ast::{DocumentTree, Node, NodeType, Span};
///
/// let mut tree = DocumentTree::new(Node::from_source(NodeType::Document, Span::new(0, 5)));
/// let root = tree.root();
/// let para = tree.push_child(root, Node::from_source(NodeType::Paragraph, Span::new(0, 5)));
///
/// assert_eq!(tree.parent(para), Some(root));
/// assert_eq!(tree.children(root), &[para]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl DocumentTree {
    /// Creates a tree holding only `root`.
    pub fn new(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
        }
    }

    /// Returns the root handle.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes ever allocated, attached or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds only its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the node for `id`, or `None` if the handle is foreign.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the node type of `id`.
    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type
    }

    /// Returns the parent of `id`, or `None` for the root and detached nodes.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the ordered children of `id`.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the position of `id` within its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Returns the siblings before `id`, nearest first.
    pub fn previous_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let before: &[NodeId] = match (self.parent(id), self.index_in_parent(id)) {
            (Some(parent), Some(index)) => &self.children(parent)[..index],
            _ => &[],
        };
        before.iter().rev().copied()
    }

    /// Iterates over `id`'s ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, id)
    }

    /// Iterates over `id` and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    /// Concatenates the text of all `Str`, `Code` and `CodeBlock` nodes below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .map(|n| self.node(n))
            .filter(|n| {
                matches!(
                    n.node_type,
                    NodeType::Str | NodeType::Code | NodeType::CodeBlock
                )
            })
            .filter_map(Node::text)
            .collect()
    }

    /// Returns true if `id` or anything below it has been changed since parsing.
    #[inline]
    pub fn is_modified(&self, id: NodeId) -> bool {
        self.node(id).modified
    }

    /// Appends a node while building the tree.
    ///
    /// Unlike the editing operations this does not mark anything as modified;
    /// parsers use it to construct the initial tree.
    pub fn push_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Sets the leading and trailing source gaps of a parsed node.
    pub fn set_gaps(&mut self, id: NodeId, leading: Span, trailing: Span) {
        let node = &mut self.nodes[id.index()];
        node.leading = leading;
        node.trailing = trailing;
    }

    /// Sets the blank-line layout hint recorded at parse time.
    pub fn init_blank_before(&mut self, id: NodeId, blank_before: bool) {
        self.nodes[id.index()].blank_before = blank_before;
    }

    /// Inserts `node` as the sibling immediately before `reference`.
    ///
    /// Returns `None` when `reference` has no parent (the root or a detached node).
    pub fn insert_before(&mut self, reference: NodeId, node: Node) -> Option<NodeId> {
        let parent = self.parent(reference)?;
        let index = self.index_in_parent(reference)?;
        Some(self.insert_at(parent, index, node))
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, mut node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.insert(index, id);
        self.mark_modified(parent);
        id
    }

    /// Detaches `id` from its parent.
    ///
    /// The node stays in the arena but is no longer reachable from the root
    /// and its parent link is cleared. Returns false if it was not attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(index) = self.index_in_parent(id) else {
            return false;
        };
        self.nodes[parent.index()].children.remove(index);
        self.nodes[id.index()].parent = None;
        self.mark_modified(parent);
        true
    }

    /// Replaces the child order of `parent` with `order`.
    ///
    /// `order` must be a permutation of the current children. The parent is
    /// marked modified only when the order actually changes.
    pub fn reorder_children(&mut self, parent: NodeId, order: Vec<NodeId>) {
        debug_assert_eq!(order.len(), self.children(parent).len());
        debug_assert!(order.iter().all(|c| self.parent(*c) == Some(parent)));

        if self.nodes[parent.index()].children == order {
            return;
        }
        self.nodes[parent.index()].children = order;
        self.mark_modified(parent);
    }

    /// Updates the blank-line layout hint of an attached node.
    pub fn set_blank_before(&mut self, id: NodeId, blank_before: bool) {
        if self.nodes[id.index()].blank_before == blank_before {
            return;
        }
        self.nodes[id.index()].blank_before = blank_before;
        if let Some(parent) = self.parent(id) {
            self.mark_modified(parent);
        }
    }

    /// Marks `id` and all its ancestors as modified.
    fn mark_modified(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            let entry = &mut self.nodes[node.index()];
            if entry.modified {
                break;
            }
            entry.modified = true;
            current = entry.parent;
        }
    }
}
