//! Node definition.
//!
//! The core node type stored in a [`DocumentTree`](crate::DocumentTree).

use std::fmt;

use crate::{NodeType, Span};

/// Stable handle to a node inside a [`DocumentTree`](crate::DocumentTree).
///
/// Handles stay valid for the lifetime of the tree, including after the node
/// has been detached. Identity is by handle: two links with the same URL are
/// two different `NodeId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the document tree.
///
/// Nodes parsed from a document carry a `span` into the source text together
/// with the `leading` gap (the bytes between the previous sibling, or the
/// parent start, and this node) and, for containers, the `trailing` gap after
/// the last child. Nodes created by transforms are *synthetic*: they have no
/// span and render as their `value` verbatim.
#[derive(Debug, Clone)]
pub struct Node {
    /// The type of this node.
    pub node_type: NodeType,

    /// Byte span in the source text. `None` for synthetic nodes.
    pub span: Option<Span>,

    /// Source bytes between the previous sibling (or parent start) and this node.
    pub leading: Span,

    /// Source bytes between the last child and the end of this node.
    pub trailing: Span,

    /// Text value (for text nodes like Str, Code, CodeBlock, Html).
    pub value: Option<String>,

    /// Additional node-specific data.
    pub data: NodeData,

    /// Layout hint: a blank line separates this node from its previous sibling.
    pub blank_before: bool,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) modified: bool,
}

/// Node-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeData {
    #[default]
    None,
    Header(u8),
    /// `true` for ordered lists.
    List(bool),
    CodeBlock(Option<String>),
    Link(LinkData),
    /// Normalized label of a link or image reference.
    Reference(String),
    /// A link reference definition and its normalized label.
    Definition { label: String, link: LinkData },
}

/// Destination of a link or image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    pub url: String,
    pub title: Option<String>,
}

impl Node {
    /// Creates a node backed by the given source span.
    pub fn from_source(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            span: Some(span),
            leading: Span::empty_at(span.start),
            trailing: Span::empty_at(span.end),
            value: None,
            data: NodeData::None,
            blank_before: false,
            parent: None,
            children: Vec::new(),
            modified: false,
        }
    }

    /// Creates a synthetic node whose rendering is exactly `value`.
    pub fn synthetic(node_type: NodeType, value: impl Into<String>) -> Self {
        Self {
            node_type,
            span: None,
            leading: Span::default(),
            trailing: Span::default(),
            value: Some(value.into()),
            data: NodeData::None,
            blank_before: false,
            parent: None,
            children: Vec::new(),
            modified: false,
        }
    }

    /// Sets the text value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the node data.
    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    /// Returns true if this node was created by a transform rather than parsed.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.span.is_none()
    }

    /// Returns true if this node has children.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the text value of this node, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the link destination for `Link`, `Image` and `Definition` nodes.
    #[inline]
    pub fn url(&self) -> Option<&str> {
        match &self.data {
            NodeData::Link(link) | NodeData::Definition { link, .. } => Some(&link.url),
            _ => None,
        }
    }

    /// Returns the normalized label of a reference or definition.
    #[inline]
    pub fn label(&self) -> Option<&str> {
        match &self.data {
            NodeData::Reference(label) | NodeData::Definition { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Returns the parent handle, if attached.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the ordered child handles.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl NodeData {
    /// Creates node data for a link.
    pub fn link(url: impl Into<String>, title: Option<String>) -> Self {
        Self::Link(LinkData {
            url: url.into(),
            title,
        })
    }

    /// Creates node data for a link reference definition.
    pub fn definition(
        label: impl Into<String>,
        url: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self::Definition {
            label: label.into(),
            link: LinkData {
                url: url.into(),
                title,
            },
        }
    }
}
