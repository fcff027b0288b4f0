//! Pre-processing transforms applied before links are extracted.

use starlist_ast::{DocumentTree, NodeType};
use tracing::{debug, warn};

/// A transform that removes parts of a document before annotation.
pub trait Prune: Send + Sync {
    fn prune(&self, tree: &mut DocumentTree);
}

/// Leaves the document untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrune;

impl Prune for NoPrune {
    fn prune(&self, _tree: &mut DocumentTree) {}
}

/// Removes every top-level block before the first heading titled `title`.
///
/// Lists whose README opens with badges, sponsors and a table of contents use
/// this to start at the real content. If no such heading exists the
/// document is left as is.
#[derive(Debug, Clone)]
pub struct PruneBeforeHeading {
    title: String,
}

impl PruneBeforeHeading {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Prune for PruneBeforeHeading {
    fn prune(&self, tree: &mut DocumentTree) {
        let root = tree.root();
        let blocks = tree.children(root).to_vec();
        let Some(position) = blocks.iter().position(|&block| {
            tree.node_type(block) == NodeType::Header
                && tree.text_content(block).trim() == self.title
        }) else {
            warn!(heading = %self.title, "Heading not found, nothing pruned");
            return;
        };

        for &block in &blocks[..position] {
            tree.detach(block);
        }
        debug!(heading = %self.title, "Pruned {} blocks", position);
    }
}

impl<F> Prune for F
where
    F: Fn(&mut DocumentTree) + Send + Sync,
{
    fn prune(&self, tree: &mut DocumentTree) {
        self(tree)
    }
}
