//! Renders a [`DocumentTree`] back to Markdown.
//!
//! Rendering splices the original source: a node that was not touched since
//! parsing is emitted as its exact source slice, so formatting, entities and
//! whitespace survive untouched. Only modified containers are rebuilt, by
//! walking their current children and reusing the recorded source gaps.

use starlist_ast::{DocumentTree, Node, NodeData, NodeId, NodeType, Span};

use crate::RenderError;
use crate::layout::list_gap;

/// Markdown renderer.
///
/// The renderer needs the exact source string the tree was parsed from.
pub struct MarkdownRenderer;

/// Unit of work on the render stack.
enum Task<'t> {
    Node(NodeId),
    Source(Span),
    Text(&'t str),
    /// Gap before a list item that has been moved.
    ListGap { gap: Span, blank_before: bool },
    /// Writes `number` in place of the item number at `marker`, which the
    /// next source slice starts with.
    Ordinal { number: Span, marker: Span },
}

impl MarkdownRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders `tree` as Markdown, copying unmodified regions from `source`.
    pub fn render(&self, source: &str, tree: &DocumentTree) -> Result<String, RenderError> {
        let mut out = String::with_capacity(source.len() + source.len() / 8);
        let mut tasks = vec![Task::Node(tree.root())];
        let mut replaced: Option<Span> = None;

        while let Some(task) = tasks.pop() {
            match task {
                Task::Node(id) => self.expand(tree, id, source, &mut tasks)?,
                Task::Source(span) => {
                    let span = match replaced.take() {
                        Some(marker) if marker.start == span.start && marker.end <= span.end => {
                            Span::new(marker.end, span.end)
                        }
                        _ => span,
                    };
                    out.push_str(slice(source, span)?);
                }
                Task::Text(text) => out.push_str(text),
                Task::ListGap { gap, blank_before } => {
                    let text = slice(source, gap)?;
                    let at_line_start = out.is_empty() || out.ends_with('\n');
                    out.push_str(&list_gap(text, blank_before, at_line_start));
                }
                Task::Ordinal { number, marker } => {
                    out.push_str(slice(source, number)?);
                    replaced = Some(marker);
                }
            }
        }

        Ok(out)
    }

    /// Replaces a node task with the tasks that render it.
    fn expand<'t>(
        &self,
        tree: &'t DocumentTree,
        id: NodeId,
        source: &str,
        tasks: &mut Vec<Task<'t>>,
    ) -> Result<(), RenderError> {
        let node = tree.get(id).ok_or(RenderError::UnknownNode(id))?;

        let sequence = match node.span {
            None => {
                let mut sequence = Vec::with_capacity(node.children().len() + 1);
                if let Some(text) = node.text() {
                    sequence.push(Task::Text(text));
                }
                sequence.extend(node.children().iter().map(|&c| Task::Node(c)));
                sequence
            }
            Some(span) if !tree.is_modified(id) => vec![Task::Source(span)],
            Some(span) => self.splice(tree, node, span, source)?,
        };

        tasks.extend(sequence.into_iter().rev());
        Ok(())
    }

    /// Rebuilds a modified container.
    ///
    /// The source-backed children, sorted by their original position, define
    /// the slots. The k-th source child in current order takes the gap that
    /// originally preceded slot k; synthetic children are emitted right before
    /// the next source child. In an ordered list the k-th item also takes the
    /// number originally written at slot k.
    fn splice<'t>(
        &self,
        tree: &'t DocumentTree,
        node: &'t Node,
        span: Span,
        source: &str,
    ) -> Result<Vec<Task<'t>>, RenderError> {
        let mut slots: Vec<&Node> = Vec::with_capacity(node.children().len());
        for &child in node.children() {
            let child_node = tree.get(child).ok_or(RenderError::UnknownNode(child))?;
            if !child_node.is_synthetic() {
                slots.push(child_node);
            }
        }
        slots.sort_by_key(|n| n.span.map(|s| s.start));

        let is_list = node.node_type == NodeType::List;
        let is_ordered = is_list && node.data == NodeData::List(true);
        let mut sequence = Vec::with_capacity(node.children().len() * 2 + 1);
        let mut pending = Vec::new();
        let mut slot = 0;

        for &child in node.children() {
            let child_node = tree.node(child);
            if child_node.is_synthetic() {
                pending.push(Task::Node(child));
                continue;
            }

            let gap = if slot == 0 {
                let leading = slots[0].leading;
                (leading.start == span.start).then_some(leading)
            } else {
                Some(slots[slot].leading)
            };

            match gap {
                Some(gap) if is_list && slot > 0 => sequence.push(Task::ListGap {
                    gap,
                    blank_before: child_node.blank_before,
                }),
                Some(gap) => sequence.push(Task::Source(gap)),
                None => {}
            }
            sequence.append(&mut pending);
            if is_ordered {
                let number = item_number(source, slots[slot]);
                let marker = item_number(source, child_node);
                if let (Some(number), Some(marker)) = (number, marker)
                    && number.slice(source) != marker.slice(source)
                {
                    sequence.push(Task::Ordinal { number, marker });
                }
            }
            sequence.push(Task::Node(child));
            slot += 1;
        }
        sequence.append(&mut pending);

        let last_end = slots.iter().filter_map(|n| n.span).map(|s| s.end).max();
        if last_end == Some(node.trailing.start) {
            sequence.push(Task::Source(node.trailing));
        }

        Ok(sequence)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Span of the digits that open an ordered list item.
fn item_number(source: &str, item: &Node) -> Option<Span> {
    let span = item.span?;
    let digits = span
        .slice(source)?
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    (digits > 0).then(|| Span::new(span.start, span.start + digits as u32))
}

fn slice(source: &str, span: Span) -> Result<&str, RenderError> {
    span.slice(source).ok_or(RenderError::InvalidSpan {
        start: span.start,
        end: span.end,
        len: source.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MarkdownParser, Parser};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use starlist_ast::walk::find_all;

    fn parse(source: &str) -> DocumentTree {
        MarkdownParser::new().parse(source).unwrap()
    }

    fn render(source: &str, tree: &DocumentTree) -> String {
        MarkdownRenderer::new().render(source, tree).unwrap()
    }

    #[rstest]
    #[case::empty("")]
    #[case::heading_and_list("# Awesome\n\n* [a](https://github.com/a/a) - A\n* b\n")]
    #[case::entities_and_emphasis("Tom &amp; *Jerry*  \nnext line\n")]
    #[case::crlf("* one\r\n* two\r\n")]
    #[case::table("| A | B |\n|:--|--:|\n| 1 | 2 |\n")]
    #[case::no_trailing_newline("text without newline")]
    fn test_unmodified_document_is_byte_identical(#[case] source: &str) {
        let tree = parse(source);
        assert_eq!(render(source, &tree), source);
    }

    #[test]
    fn test_modified_but_unchanged_structure_is_byte_identical() {
        let source = "# Title\n\n> quote with [link](https://x.example)\n\n* a\n  * nested\n* b\n";
        let mut tree = parse(source);
        let link = find_all(&tree, NodeType::Link)[0];
        let inserted = tree
            .insert_before(link, Node::synthetic(NodeType::Str, "x"))
            .unwrap();
        tree.detach(inserted);

        assert!(tree.is_modified(tree.root()));
        assert_eq!(render(source, &tree), source);
    }

    #[test]
    fn test_marker_inserted_before_link() {
        let source = "* [link1](https://github.com/owner1/repo) - link 1 text\n";
        let mut tree = parse(source);
        let link = find_all(&tree, NodeType::Link)[0];
        tree.insert_before(
            link,
            Node::synthetic(
                NodeType::Html,
                "<code>&nbsp;&nbsp;&nbsp;&nbsp;10</code>",
            ),
        );
        tree.insert_before(link, Node::synthetic(NodeType::Str, " "));

        assert_eq!(
            render(source, &tree),
            "* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [link1](https://github.com/owner1/repo) - link 1 text\n"
        );
    }

    #[test]
    fn test_reordered_list() {
        let source = "* a\n* b\n* c\n";
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let [a, b, c] = *tree.children(list) else {
            panic!("expected three items");
        };
        tree.reorder_children(list, vec![c, a, b]);

        assert_eq!(render(source, &tree), "* c\n* a\n* b\n");
    }

    #[test]
    fn test_reordered_nested_list_keeps_indentation() {
        let source = "* a\n  * x\n  * y\n* b\n";
        let mut tree = parse(source);
        let inner = find_all(&tree, NodeType::List)[1];
        let order: Vec<_> = tree.children(inner).iter().rev().copied().collect();
        tree.reorder_children(inner, order);

        assert_eq!(render(source, &tree), "* a\n  * y\n  * x\n* b\n");
    }

    #[test]
    fn test_loose_list_becomes_tight_when_hints_cleared() {
        let source = "* a\n\n* b\n";
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let [a, b] = *tree.children(list) else {
            panic!("expected two items");
        };
        tree.reorder_children(list, vec![b, a]);
        tree.set_blank_before(b, true);
        tree.set_blank_before(a, false);

        assert_eq!(render(source, &tree), "* b\n* a\n");
    }

    #[test]
    fn test_blank_line_hint_is_added() {
        let source = "* a\n* b\n";
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let b = tree.children(list)[1];
        tree.set_blank_before(b, true);

        assert_eq!(render(source, &tree), "* a\n\n* b\n");
    }

    #[test]
    fn test_removed_leading_blocks() {
        let source = "# Title\n\nintro\n\n## Contents\n\n* a\n";
        let mut tree = parse(source);
        let root = tree.root();
        let removed: Vec<_> = tree.children(root)[..2].to_vec();
        for id in removed {
            tree.detach(id);
        }

        assert_eq!(render(source, &tree), "## Contents\n\n* a\n");
    }

    #[test]
    fn test_prepended_block() {
        let source = "# Title\n";
        let mut tree = parse(source);
        let first = tree.children(tree.root())[0];
        tree.insert_before(first, Node::synthetic(NodeType::Html, "About this list\n\n"));

        assert_eq!(render(source, &tree), "About this list\n\n# Title\n");
    }

    #[rstest]
    #[case::heading("* a\n* b\n\n## H\n", "* b\n* a\n\n## H\n")]
    #[case::paragraph("* a\n* b\n\npara\n", "* b\n* a\n\npara\n")]
    #[case::no_trailing_newline("* a\n* b", "* b\n* a")]
    #[case::crlf("* a\r\n* b\r\n\r\n## H\r\n", "* b\r\n* a\r\n\r\n## H\r\n")]
    #[case::block_quote("> * a\n> * b\n>\n> after\n", "> * b\n> * a\n>\n> after\n")]
    #[case::nested_before_heading(
        "* a\n  * x\n  * y\n\n## H\n",
        "* a\n  * y\n  * x\n\n## H\n"
    )]
    fn test_reordered_list_keeps_following_block(#[case] source: &str, #[case] expected: &str) {
        let mut tree = parse(source);
        let list = *find_all(&tree, NodeType::List).last().unwrap();
        let order: Vec<_> = tree.children(list).iter().rev().copied().collect();
        tree.reorder_children(list, order);

        assert_eq!(render(source, &tree), expected);
    }

    #[test]
    fn test_loose_list_in_block_quote_becomes_tight() {
        let source = "> * a\n>\n> * b\n";
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let [a, b] = *tree.children(list) else {
            panic!("expected two items");
        };
        tree.reorder_children(list, vec![b, a]);
        tree.set_blank_before(b, true);
        tree.set_blank_before(a, false);

        assert_eq!(render(source, &tree), "> * b\n> * a\n");
    }

    #[rstest]
    #[case::sequential("1. a\n2. b\n3. c\n", "1. c\n2. b\n3. a\n")]
    #[case::custom_start("7) a\n8) b\n9) c\n", "7) c\n8) b\n9) a\n")]
    #[case::repeated_ones("1. a\n1. b\n1. c\n", "1. c\n1. b\n1. a\n")]
    #[case::width_change("9. a\n10. b\n", "9. b\n10. a\n")]
    fn test_reordered_ordered_list_is_renumbered(#[case] source: &str, #[case] expected: &str) {
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let order: Vec<_> = tree.children(list).iter().rev().copied().collect();
        tree.reorder_children(list, order);

        assert_eq!(render(source, &tree), expected);
    }

    #[test]
    fn test_renumbered_item_with_marker() {
        let source = "1. [a](https://github.com/o/a)\n2. [b](https://github.com/o/b)\n";
        let mut tree = parse(source);
        let list = find_all(&tree, NodeType::List)[0];
        let link = find_all(&tree, NodeType::Link)[1];
        tree.insert_before(link, Node::synthetic(NodeType::Str, "* "));
        let order: Vec<_> = tree.children(list).iter().rev().copied().collect();
        tree.reorder_children(list, order);

        assert_eq!(
            render(source, &tree),
            "1. * [b](https://github.com/o/b)\n2. [a](https://github.com/o/a)\n"
        );
    }

    #[test]
    fn test_wrong_source_is_an_error() {
        let tree = parse("hello world");
        let result = MarkdownRenderer::new().render("hi", &tree);

        assert!(matches!(result, Err(RenderError::InvalidSpan { .. })));
    }
}
