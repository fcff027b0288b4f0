//! Link extraction.

use std::collections::HashMap;

use starlist_ast::{DocumentTree, NodeId, NodeType};
use tracing::debug;

use crate::RepoRef;

/// A link node whose destination names a GitHub repository.
///
/// `node` is either an inline `Link` or a `LinkReference` whose definition
/// points at the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub node: NodeId,
    pub repo: RepoRef,
}

/// Collects every qualifying link in document order.
///
/// Reference links resolve through their definition. Links whose
/// destination is not a repository URL are skipped silently.
pub fn extract_links(tree: &DocumentTree) -> Vec<ExtractedLink> {
    let definitions = definitions(tree);
    let links: Vec<_> = tree
        .descendants(tree.root())
        .filter_map(|node| {
            let data = tree.node(node);
            let url = match data.node_type {
                NodeType::Link => data.url()?,
                NodeType::LinkReference => definitions.get(data.label()?).copied()?,
                _ => return None,
            };
            let repo = RepoRef::from_url(url)?;
            Some(ExtractedLink { node, repo })
        })
        .collect();

    debug!("Extracted {} repository links", links.len());
    links
}

/// Maps definition labels to destinations. The first definition of a label
/// wins.
fn definitions(tree: &DocumentTree) -> HashMap<&str, &str> {
    let mut definitions = HashMap::new();
    for id in tree.descendants(tree.root()) {
        let node = tree.node(id);
        if node.node_type != NodeType::Definition {
            continue;
        }
        if let (Some(label), Some(url)) = (node.label(), node.url()) {
            definitions.entry(label).or_insert(url);
        }
    }
    definitions
}
