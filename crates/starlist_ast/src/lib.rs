//! # starlist_ast
//!
//! Document tree definitions for starlist.
//!
//! This crate provides the mutable tree that the annotation engine edits
//! between parsing and rendering.
//!
//! ## Architecture
//!
//! - All nodes of one document are stored in a single arena (`Vec`)
//! - Nodes refer to each other through [`NodeId`] handles, never pointers
//! - Every parsed node remembers its source span so untouched subtrees can
//!   be reproduced byte for byte
//! - Edits mark the edited node and its ancestors as modified
//!
//! ## Example
//!
//! ```rust
//! use starlist_ast::{DocumentTree, Node, NodeType, Span};
//!
//! let mut tree = DocumentTree::new(Node::from_source(NodeType::Document, Span::new(0, 11)));
//! let para = tree.push_child(tree.root(), Node::from_source(NodeType::Paragraph, Span::new(0, 11)));
//! let text = tree.push_child(para, Node::from_source(NodeType::Str, Span::new(0, 11)).with_value("hello world"));
//!
//! tree.insert_before(text, Node::synthetic(NodeType::Str, ">> "));
//! assert!(tree.is_modified(para));
//! ```

mod arena;
mod node;
mod node_type;
mod span;
pub mod walk;

pub use arena::DocumentTree;
pub use node::{LinkData, Node, NodeData, NodeId};
pub use node_type::NodeType;
pub use span::Span;
