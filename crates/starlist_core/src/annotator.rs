//! Star markers and list-item tagging.

use std::collections::HashMap;

use starlist_ast::{DocumentTree, Node, NodeId, NodeType};
use tracing::debug;

use crate::ExtractedLink;

/// Star count tagged on list items, consumed by the resorter.
///
/// Items without an entry sort as lower than any tagged item.
pub type StarAttributes = HashMap<NodeId, u64>;

/// Formats the visible marker for `count`.
///
/// The count is right-aligned in six columns and the padding is written as
/// `&nbsp;` so it survives HTML whitespace collapsing.
///
/// ```rust
/// use starlist_core::format_marker;
///
/// assert_eq!(format_marker(10), "<code>&nbsp;&nbsp;&nbsp;&nbsp;10</code>");
/// ```
pub fn format_marker(count: u64) -> String {
    format!("<code>{:>6}</code>", count).replace(' ', "&nbsp;")
}

/// Inserts a marker before every resolved link and tags list items.
///
/// Links are processed in document order. A count of zero gets neither a
/// marker nor a tag. Only the first link of its inline container tags the
/// enclosing list item; a later tag for the same item overwrites an earlier
/// one. Running this twice on the same tree inserts a second marker.
pub fn annotate(
    tree: &mut DocumentTree,
    links: &[ExtractedLink],
    counts: &HashMap<NodeId, u64>,
) -> StarAttributes {
    let mut attributes = StarAttributes::new();
    let mut annotated = 0usize;

    for link in links {
        let Some(&count) = counts.get(&link.node) else {
            continue;
        };
        if count < 1 {
            continue;
        }

        let is_first_link = !tree.previous_siblings(link.node).any(|sibling| {
            matches!(
                tree.node_type(sibling),
                NodeType::Link | NodeType::LinkReference
            )
        });

        let marker = Node::synthetic(NodeType::Html, format_marker(count));
        if tree.insert_before(link.node, marker).is_none() {
            // Detached by an earlier stage.
            continue;
        }
        tree.insert_before(link.node, Node::synthetic(NodeType::Str, " "));
        annotated += 1;

        if !is_first_link {
            continue;
        }
        if let Some(item) = tree
            .ancestors(link.node)
            .find(|&ancestor| tree.node_type(ancestor) == NodeType::ListItem)
        {
            attributes.insert(item, count);
        }
    }

    debug!(
        "Annotated {} links, tagged {} list items",
        annotated,
        attributes.len()
    );
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_links;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use starlist_ast::walk::find_all;
    use starlist_parser::{MarkdownParser, MarkdownRenderer, Parser};

    fn run(source: &str, counts: &[u64]) -> (DocumentTree, StarAttributes, String) {
        let mut tree = MarkdownParser::new().parse(source).unwrap();
        let links = extract_links(&tree);
        let resolved: HashMap<_, _> = links
            .iter()
            .zip(counts)
            .filter(|(_, count)| **count != u64::MAX)
            .map(|(link, count)| (link.node, *count))
            .collect();
        let attributes = annotate(&mut tree, &links, &resolved);
        let rendered = MarkdownRenderer::new().render(source, &tree).unwrap();
        (tree, attributes, rendered)
    }

    #[rstest]
    #[case(1, "<code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;1</code>")]
    #[case(10, "<code>&nbsp;&nbsp;&nbsp;&nbsp;10</code>")]
    #[case(123456, "<code>123456</code>")]
    #[case(1234567, "<code>1234567</code>")]
    fn test_format_marker(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(format_marker(count), expected);
    }

    #[test]
    fn test_marker_before_link() {
        let (tree, attributes, rendered) = run(
            "* [link1](https://github.com/owner1/repo) - link 1 text\n",
            &[10],
        );

        assert_eq!(
            rendered,
            "* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [link1](https://github.com/owner1/repo) - link 1 text\n"
        );
        let item = find_all(&tree, NodeType::ListItem)[0];
        assert_eq!(attributes.get(&item), Some(&10));
    }

    #[test]
    fn test_zero_count_is_skipped() {
        let source = "* [a](https://github.com/a/a)\n";
        let (_, attributes, rendered) = run(source, &[0]);

        assert_eq!(rendered, source);
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_only_first_link_tags_item() {
        // First link unresolved, second resolved.
        let (tree, attributes, rendered) = run(
            "* [a](https://github.com/a/a) and [b](https://github.com/a/b)\n",
            &[u64::MAX, 50],
        );

        assert!(attributes.is_empty());
        let item = find_all(&tree, NodeType::ListItem)[0];
        assert!(!attributes.contains_key(&item));
        assert_eq!(
            rendered,
            "* [a](https://github.com/a/a) and <code>&nbsp;&nbsp;&nbsp;&nbsp;50</code> [b](https://github.com/a/b)\n"
        );
    }

    #[test]
    fn test_nested_link_tags_nearest_item() {
        let (tree, attributes, _) = run(
            "* [outer](https://github.com/a/outer)\n  * [inner](https://github.com/a/inner)\n",
            &[5, 7],
        );
        let items = find_all(&tree, NodeType::ListItem);

        assert_eq!(attributes.get(&items[0]), Some(&5));
        assert_eq!(attributes.get(&items[1]), Some(&7));
    }

    #[test]
    fn test_later_paragraph_overwrites_tag() {
        let (tree, attributes, _) = run(
            "* [a](https://github.com/a/a)\n\n  [b](https://github.com/a/b)\n",
            &[3, 9],
        );
        let item = find_all(&tree, NodeType::ListItem)[0];

        assert_eq!(attributes.get(&item), Some(&9));
    }

    #[test]
    fn test_reference_link_is_marked_and_tags_item() {
        let (tree, attributes, rendered) = run(
            "* [a][repo] - text\n\n[repo]: https://github.com/a/a\n",
            &[42],
        );
        let item = find_all(&tree, NodeType::ListItem)[0];

        assert_eq!(attributes.get(&item), Some(&42));
        assert_eq!(
            rendered,
            "* <code>&nbsp;&nbsp;&nbsp;&nbsp;42</code> [a][repo] - text\n\n[repo]: https://github.com/a/a\n"
        );
    }

    #[test]
    fn test_reference_link_counts_as_earlier_link() {
        let (_, attributes, _) = run(
            "* [a][] and [b](https://github.com/a/b)\n\n[a]: https://github.com/a/a\n",
            &[u64::MAX, 50],
        );

        assert!(attributes.is_empty());
    }

    #[test]
    fn test_link_outside_list_is_marked_but_not_tagged() {
        let (_, attributes, rendered) = run("See [x](https://github.com/a/x).\n", &[2]);

        assert!(attributes.is_empty());
        assert_eq!(
            rendered,
            "See <code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;2</code> [x](https://github.com/a/x).\n"
        );
    }

    #[test]
    fn test_annotating_twice_adds_second_marker() {
        let source = "* [a](https://github.com/a/a)\n";
        let mut tree = MarkdownParser::new().parse(source).unwrap();
        let links = extract_links(&tree);
        let counts = HashMap::from([(links[0].node, 1)]);

        annotate(&mut tree, &links, &counts);
        annotate(&mut tree, &links, &counts);

        let marker = format_marker(1);
        let rendered = MarkdownRenderer::new().render(source, &tree).unwrap();
        assert_eq!(rendered.matches(&marker).count(), 2);
    }
}
