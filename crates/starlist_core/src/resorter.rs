//! Reordering of list items by star count.

use std::cmp::Reverse;

use starlist_ast::walk::find_all;
use starlist_ast::{DocumentTree, NodeType};
use tracing::debug;

use crate::StarAttributes;

/// Sorts the items of every list by descending star count.
///
/// The sort is stable and untagged items rank below every tagged one, so
/// equal counts and untagged runs keep their document order. Nested lists are
/// sorted independently. After sorting, the first item of each list is
/// flagged as preceded by a blank line and the others are not, which renders
/// previously loose lists as tight ones.
///
/// Returns the number of lists whose order changed.
pub fn resort_lists(tree: &mut DocumentTree, attributes: &StarAttributes) -> usize {
    let mut reordered = 0;

    for list in find_all(tree, NodeType::List) {
        let mut items = tree.children(list).to_vec();
        if items.len() < 2 {
            continue;
        }

        items.sort_by_key(|item| Reverse(attributes.get(item).copied()));
        if items != tree.children(list) {
            reordered += 1;
        }

        for (index, &item) in items.iter().enumerate() {
            tree.set_blank_before(item, index == 0);
        }
        tree.reorder_children(list, items);
    }

    debug!("Reordered {} lists", reordered);
    reordered
}
