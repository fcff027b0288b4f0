//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! This parser converts Markdown into a [`DocumentTree`] using the `markdown`
//! crate, which provides mdast-compatible AST output. Besides the node
//! structure, every node records the source gaps around it so that
//! [`MarkdownRenderer`](crate::MarkdownRenderer) can reproduce untouched
//! regions byte for byte.

use markdown::mdast;
use markdown::{Constructs, ParseOptions, to_mdast};
use starlist_ast::{DocumentTree, Node, NodeData, NodeId, NodeType, Span};

use crate::layout::{has_blank_line, trim_trailing_blank_lines};
use crate::{ParseError, Parser};

/// Markdown parser implementation.
///
/// Uses `markdown-rs` with GitHub Flavored Markdown enabled (tables,
/// strikethrough, footnotes). Autolink literals are off: a bare URL stays
/// plain text and only explicit links are recognised.
pub struct MarkdownParser;

/// A pending conversion: the mdast node, the arena parent, its leading gap
/// and its span.
type Pending<'m> = (&'m mdast::Node, NodeId, Span, Span);

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self
    }

    /// Gets default parse options (GFM without autolink literals).
    fn default_options() -> ParseOptions {
        ParseOptions {
            constructs: Constructs {
                gfm_autolink_literal: false,
                ..Constructs::gfm()
            },
            ..ParseOptions::gfm()
        }
    }

    /// Converts an mdast tree into an arena.
    ///
    /// Conversion uses an explicit work stack so deeply nested documents
    /// cannot overflow the call stack.
    fn convert(&self, root: &mdast::Node, source: &str) -> DocumentTree {
        let root_span = Span::new(0, source.len() as u32);
        let mut tree = DocumentTree::new(Node::from_source(NodeType::Document, root_span));
        let root_id = tree.root();

        let mut stack: Vec<Pending<'_>> = Vec::new();
        let trailing = self.schedule_children(root, root_span, root_id, source, &mut stack);
        tree.set_gaps(root_id, Span::empty_at(0), trailing);

        while let Some((node, parent, leading, span)) = stack.pop() {
            let converted = self.create_node(node, span);
            let is_parent = converted.node_type.is_parent();
            let id = tree.push_child(parent, converted);

            let trailing = if is_parent {
                self.schedule_children(node, span, id, source, &mut stack)
            } else {
                Span::empty_at(span.end)
            };
            tree.set_gaps(id, leading, trailing);

            let gap = leading.slice(source).unwrap_or_default();
            tree.init_blank_before(id, has_blank_line(gap));
        }

        tree
    }

    /// Pushes the children of `node` onto the work stack, in reverse so they
    /// are converted in document order, and returns the trailing gap.
    ///
    /// Child spans are clamped into `span` so that the gaps and spans of a
    /// container always partition its source.
    fn schedule_children<'m>(
        &self,
        node: &'m mdast::Node,
        span: Span,
        id: NodeId,
        source: &str,
        stack: &mut Vec<Pending<'m>>,
    ) -> Span {
        let children = node.children().map(Vec::as_slice).unwrap_or_default();
        let mut cursor = span.start;
        let mut scheduled = Vec::with_capacity(children.len());

        for child in children {
            let child_span = self.node_span(child, source);
            let start = child_span.start.clamp(cursor, span.end.max(cursor));
            let end = child_span.end.clamp(start, span.end.max(start));
            scheduled.push((child, id, Span::new(cursor, start), Span::new(start, end)));
            cursor = end;
        }

        stack.extend(scheduled.into_iter().rev());
        Span::new(cursor, span.end.max(cursor))
    }

    /// Converts a single mdast node, without its children.
    fn create_node(&self, node: &mdast::Node, span: Span) -> Node {
        match node {
            mdast::Node::Root(_) => Node::from_source(NodeType::Document, span),

            mdast::Node::Paragraph(_) => Node::from_source(NodeType::Paragraph, span),

            mdast::Node::Heading(heading) => Node::from_source(NodeType::Header, span)
                .with_data(NodeData::Header(heading.depth)),

            mdast::Node::Text(text) => {
                Node::from_source(NodeType::Str, span).with_value(text.value.as_str())
            }

            mdast::Node::Emphasis(_) => Node::from_source(NodeType::Emphasis, span),

            mdast::Node::Strong(_) => Node::from_source(NodeType::Strong, span),

            mdast::Node::InlineCode(code) => {
                Node::from_source(NodeType::Code, span).with_value(code.value.as_str())
            }

            mdast::Node::Code(code) => Node::from_source(NodeType::CodeBlock, span)
                .with_value(code.value.as_str())
                .with_data(NodeData::CodeBlock(code.lang.clone())),

            mdast::Node::Link(link) => Node::from_source(NodeType::Link, span)
                .with_data(NodeData::link(link.url.as_str(), link.title.clone())),

            mdast::Node::Image(image) => Node::from_source(NodeType::Image, span)
                .with_data(NodeData::link(image.url.as_str(), image.title.clone())),

            mdast::Node::List(list) => {
                Node::from_source(NodeType::List, span).with_data(NodeData::List(list.ordered))
            }

            mdast::Node::ListItem(_) => Node::from_source(NodeType::ListItem, span),

            mdast::Node::Blockquote(_) => Node::from_source(NodeType::BlockQuote, span),

            mdast::Node::ThematicBreak(_) => Node::from_source(NodeType::HorizontalRule, span),

            mdast::Node::Break(_) => Node::from_source(NodeType::Break, span),

            mdast::Node::Html(html) => {
                Node::from_source(NodeType::Html, span).with_value(html.value.as_str())
            }

            mdast::Node::Delete(_) => Node::from_source(NodeType::Delete, span),

            // Table support (GFM)
            mdast::Node::Table(_) => Node::from_source(NodeType::Table, span),
            mdast::Node::TableRow(_) => Node::from_source(NodeType::TableRow, span),
            mdast::Node::TableCell(_) => Node::from_source(NodeType::TableCell, span),

            // Footnotes (GFM)
            mdast::Node::FootnoteDefinition(_) => {
                Node::from_source(NodeType::FootnoteDefinition, span)
            }
            mdast::Node::FootnoteReference(_) => {
                Node::from_source(NodeType::FootnoteReference, span)
            }

            mdast::Node::LinkReference(reference) => {
                Node::from_source(NodeType::LinkReference, span)
                    .with_data(NodeData::Reference(normalize_label(&reference.identifier)))
            }
            mdast::Node::ImageReference(reference) => {
                Node::from_source(NodeType::ImageReference, span)
                    .with_data(NodeData::Reference(normalize_label(&reference.identifier)))
            }

            mdast::Node::Definition(def) => Node::from_source(NodeType::Definition, span)
                .with_data(NodeData::definition(
                    normalize_label(&def.identifier),
                    def.url.as_str(),
                    def.title.clone(),
                )),

            // Anything else is kept as opaque source text.
            _ => Node::from_source(NodeType::Html, span),
        }
    }

    /// Gets the span for an mdast node.
    ///
    /// Blocks end at their last non-blank line. Line endings and blank lines
    /// after it are left to the following gap, so moving a block never moves
    /// the separator that follows it.
    fn node_span(&self, node: &mdast::Node, source: &str) -> Span {
        let Some(pos) = node.position() else {
            return Span::new(0, 0);
        };
        let span = Span::new(pos.start.offset as u32, pos.end.offset as u32);
        if !is_block(node) {
            return span;
        }
        match span.slice(source) {
            Some(text) => {
                let trimmed = trim_trailing_blank_lines(text);
                Span::new(span.start, span.start + trimmed.len() as u32)
            }
            None => span,
        }
    }
}

/// Block nodes whose end is clamped to their last non-blank line.
fn is_block(node: &mdast::Node) -> bool {
    matches!(
        node,
        mdast::Node::Paragraph(_)
            | mdast::Node::Heading(_)
            | mdast::Node::List(_)
            | mdast::Node::ListItem(_)
            | mdast::Node::Blockquote(_)
            | mdast::Node::Code(_)
            | mdast::Node::ThematicBreak(_)
            | mdast::Node::Table(_)
            | mdast::Node::Definition(_)
            | mdast::Node::FootnoteDefinition(_)
    )
}

/// Normalizes a reference label for matching: whitespace runs collapse to
/// one space, the ends are trimmed and case is folded.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn parse(&self, source: &str) -> Result<DocumentTree, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::TooLarge { len: source.len() });
        }

        let options = Self::default_options();
        let mdast =
            to_mdast(source, &options).map_err(|e| ParseError::invalid_source(e.to_string()))?;

        Ok(self.convert(&mdast, source))
    }
}
