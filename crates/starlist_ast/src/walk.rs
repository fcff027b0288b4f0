//! Iterative traversal over a [`DocumentTree`].
//!
//! Traversals use an explicit stack, so arbitrarily deep documents never
//! exhaust the call stack.

use crate::{DocumentTree, NodeId, NodeType};

/// Pre-order, left-to-right iterator over a subtree.
pub struct Descendants<'t> {
    tree: &'t DocumentTree,
    stack: Vec<NodeId>,
}

impl<'t> Descendants<'t> {
    pub(crate) fn new(tree: &'t DocumentTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct Ancestors<'t> {
    tree: &'t DocumentTree,
    current: Option<NodeId>,
}

impl<'t> Ancestors<'t> {
    pub(crate) fn new(tree: &'t DocumentTree, start: NodeId) -> Self {
        Self {
            tree,
            current: tree.parent(start),
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Collects every node of `node_type` under the root, in pre-order.
pub fn find_all(tree: &DocumentTree, node_type: NodeType) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| tree.node_type(id) == node_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, Span};

    fn nested(depth: usize) -> (DocumentTree, NodeId) {
        let mut tree = DocumentTree::new(Node::from_source(NodeType::Document, Span::new(0, 0)));
        let mut parent = tree.root();
        for _ in 0..depth {
            parent = tree.push_child(parent, Node::from_source(NodeType::BlockQuote, Span::new(0, 0)));
        }
        (tree, parent)
    }

    #[test]
    fn test_pre_order() {
        let mut tree = DocumentTree::new(Node::from_source(NodeType::Document, Span::new(0, 0)));
        let root = tree.root();
        let a = tree.push_child(root, Node::from_source(NodeType::Paragraph, Span::new(0, 0)));
        let a1 = tree.push_child(a, Node::from_source(NodeType::Str, Span::new(0, 0)));
        let a2 = tree.push_child(a, Node::from_source(NodeType::Link, Span::new(0, 0)));
        let b = tree.push_child(root, Node::from_source(NodeType::List, Span::new(0, 0)));

        let order: Vec<_> = tree.descendants(root).collect();
        assert_eq!(order, vec![root, a, a1, a2, b]);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let (tree, deepest) = nested(100_000);
        assert_eq!(tree.descendants(tree.root()).count(), 100_001);
        assert_eq!(tree.ancestors(deepest).count(), 100_000);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, deepest) = nested(3);
        let ancestors: Vec<_> = tree.ancestors(deepest).collect();
        assert_eq!(ancestors.len(), 3);
        assert_eq!(*ancestors.last().unwrap(), tree.root());
        assert_eq!(tree.ancestors(tree.root()).count(), 0);
    }

    #[test]
    fn test_find_all() {
        let (tree, _) = nested(4);
        assert_eq!(find_all(&tree, NodeType::BlockQuote).len(), 4);
        assert!(find_all(&tree, NodeType::List).is_empty());
    }
}
