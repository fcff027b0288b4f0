//! Node kinds of the document tree.

use std::fmt;

/// Kinds of nodes in a [`DocumentTree`](crate::DocumentTree).
///
/// The set mirrors mdast closely enough that every node produced by the
/// markdown parser has a home; nodes the engine never inspects still keep
/// their source span so they render back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeType {
    // Document structure
    /// Root document node.
    Document,

    // Block elements
    /// Paragraph containing inline content.
    Paragraph,
    /// Header/Heading (H1-H6).
    Header,
    /// Block quote.
    BlockQuote,
    /// Ordered or unordered list.
    List,
    /// Item in a list.
    ListItem,
    /// Fenced or indented code block.
    CodeBlock,
    /// Horizontal rule / thematic break.
    HorizontalRule,
    /// Raw HTML, block or inline.
    Html,

    // Inline elements
    /// Plain text string.
    Str,
    /// Soft or hard line break.
    Break,
    /// Emphasis (italic).
    Emphasis,
    /// Strong emphasis (bold).
    Strong,
    /// Strikethrough text.
    Delete,
    /// Inline code.
    Code,
    /// Hyperlink.
    Link,
    /// Image.
    Image,

    // Reference elements
    /// Link reference.
    LinkReference,
    /// Image reference.
    ImageReference,
    /// Reference definition.
    Definition,

    // Extension elements (GFM)
    /// Table.
    Table,
    /// Table row.
    TableRow,
    /// Table cell.
    TableCell,
    /// Footnote definition.
    FootnoteDefinition,
    /// Footnote reference.
    FootnoteReference,
}

impl NodeType {
    /// Returns true if this node type is a block element.
    #[inline]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            NodeType::Document
                | NodeType::Paragraph
                | NodeType::Header
                | NodeType::BlockQuote
                | NodeType::List
                | NodeType::ListItem
                | NodeType::CodeBlock
                | NodeType::HorizontalRule
                | NodeType::Html
                | NodeType::Table
                | NodeType::TableRow
                | NodeType::FootnoteDefinition
        )
    }

    /// Returns true if this node type is an inline element.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeType::Str
                | NodeType::Break
                | NodeType::Emphasis
                | NodeType::Strong
                | NodeType::Delete
                | NodeType::Code
                | NodeType::Link
                | NodeType::Image
                | NodeType::LinkReference
                | NodeType::ImageReference
                | NodeType::FootnoteReference
        )
    }

    /// Returns true if this node type can contain children.
    #[inline]
    pub const fn is_parent(&self) -> bool {
        matches!(
            self,
            NodeType::Document
                | NodeType::Paragraph
                | NodeType::Header
                | NodeType::BlockQuote
                | NodeType::List
                | NodeType::ListItem
                | NodeType::Emphasis
                | NodeType::Strong
                | NodeType::Delete
                | NodeType::Link
                | NodeType::LinkReference
                | NodeType::Table
                | NodeType::TableRow
                | NodeType::TableCell
                | NodeType::FootnoteDefinition
        )
    }

    /// Returns true if this node type carries a text value.
    #[inline]
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            NodeType::Str | NodeType::Code | NodeType::CodeBlock | NodeType::Html
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Document => "Document",
            NodeType::Paragraph => "Paragraph",
            NodeType::Header => "Header",
            NodeType::BlockQuote => "BlockQuote",
            NodeType::List => "List",
            NodeType::ListItem => "ListItem",
            NodeType::CodeBlock => "CodeBlock",
            NodeType::HorizontalRule => "HorizontalRule",
            NodeType::Html => "Html",
            NodeType::Str => "Str",
            NodeType::Break => "Break",
            NodeType::Emphasis => "Emphasis",
            NodeType::Strong => "Strong",
            NodeType::Delete => "Delete",
            NodeType::Code => "Code",
            NodeType::Link => "Link",
            NodeType::Image => "Image",
            NodeType::LinkReference => "LinkReference",
            NodeType::ImageReference => "ImageReference",
            NodeType::Definition => "Definition",
            NodeType::Table => "Table",
            NodeType::TableRow => "TableRow",
            NodeType::TableCell => "TableCell",
            NodeType::FootnoteDefinition => "FootnoteDefinition",
            NodeType::FootnoteReference => "FootnoteReference",
        };
        f.write_str(name)
    }
}
