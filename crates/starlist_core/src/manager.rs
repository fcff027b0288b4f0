//! The per-list pipeline.

use std::time::Duration;

use starlist_parser::{MarkdownParser, MarkdownRenderer, Parser};
use tracing::{debug, info};

use crate::prune::Prune;
use crate::resolver::{ResolveStats, Resolver};
use crate::traits::{DocumentFetcher, Publisher, StarCache, StarsProvider};
use crate::{ResolvedList, StarlistError, annotate, extract_links, resort_lists};

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// The rendered document, about text included.
    pub markdown: String,
    /// Qualifying links found after pruning.
    pub links: usize,
    /// Links that received a star count.
    pub resolved: usize,
    /// Lists whose item order changed.
    pub reordered_lists: usize,
    pub stats: ResolveStats,
}

/// Runs the annotation pipeline for documents.
///
/// One document goes through prune, extract, resolve, annotate, resort,
/// render and about-text prepending in sequence. Several managers, or
/// several calls on one manager, may run concurrently as long as the cache
/// tolerates shared access.
pub struct Manager<P, C> {
    provider: P,
    cache: C,
    parser: MarkdownParser,
    renderer: MarkdownRenderer,
    ttl: Option<Duration>,
}

impl<P, C> Manager<P, C>
where
    P: StarsProvider,
    C: StarCache,
{
    pub fn new(provider: P, cache: C) -> Self {
        Self {
            provider,
            cache,
            parser: MarkdownParser::new(),
            renderer: MarkdownRenderer::new(),
            ttl: None,
        }
    }

    /// Trusts cache entries younger than `ttl` without a live lookup.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Annotates and resorts `source`, returning `about` followed by the
    /// rendered document.
    pub async fn process(
        &self,
        source: &[u8],
        about: &str,
        prune: &dyn Prune,
    ) -> Result<ProcessOutcome, StarlistError> {
        let source = std::str::from_utf8(source)?;
        let mut tree = self.parser.parse(source)?;

        prune.prune(&mut tree);

        let links = extract_links(&tree);
        let resolution = Resolver::new(&self.provider, &self.cache)
            .with_ttl(self.ttl)
            .resolve(&links)
            .await;

        let attributes = annotate(&mut tree, &links, &resolution.counts);
        let reordered_lists = resort_lists(&mut tree, &attributes);

        let rendered = self.renderer.render(source, &tree)?;
        let mut markdown = String::with_capacity(about.len() + rendered.len());
        markdown.push_str(about);
        markdown.push_str(&rendered);

        Ok(ProcessOutcome {
            markdown,
            links: links.len(),
            resolved: resolution.counts.len(),
            reordered_lists,
            stats: resolution.stats,
        })
    }

    /// Fetches, processes and publishes one configured list.
    ///
    /// Nothing is published unless processing succeeded.
    pub async fn star_list<F, U>(
        &self,
        fetcher: &F,
        publisher: &U,
        list: &ResolvedList,
    ) -> Result<ProcessOutcome, StarlistError>
    where
        F: DocumentFetcher,
        U: Publisher,
    {
        info!(list = %list.id, "Fetching {}", list.source_url);
        let source = fetcher
            .fetch(&list.source_url)
            .await
            .map_err(|e| StarlistError::fetch(e.to_string()))?;
        debug!(list = %list.id, "Fetched {} bytes", source.len());

        let prune = list.pruner();
        let outcome = self.process(&source, &list.about, prune.as_ref()).await?;

        publisher
            .publish(&list.target, outcome.markdown.as_bytes())
            .await
            .map_err(|e| StarlistError::publish(e.to_string()))?;

        info!(
            list = %list.id,
            links = outcome.links,
            resolved = outcome.resolved,
            "Published {}/{}",
            list.target.owner,
            list.target.repo
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prune::{NoPrune, PruneBeforeHeading};
    use crate::test_utils::{MemoryCache, StaticProvider};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "\
# Awesome Things

## Contents

* [Tools](#tools)

## Tools

* [link1](https://github.com/owner1/repo) - link 1 text
* [site](https://example.com/x) - not a repository
* [link3](https://github.com/owner3/repo) - link 3 text
";

    #[tokio::test]
    async fn test_process_annotates_and_resorts() {
        let provider = StaticProvider::new([("owner1/repo", 10), ("owner3/repo", 30)]);
        let manager = Manager::new(provider, MemoryCache::default());

        let outcome = manager
            .process(SOURCE.as_bytes(), "", &PruneBeforeHeading::new("Contents"))
            .await
            .unwrap();

        assert_eq!(
            outcome.markdown,
            "\
## Contents

* [Tools](#tools)

## Tools

* <code>&nbsp;&nbsp;&nbsp;&nbsp;30</code> [link3](https://github.com/owner3/repo) - link 3 text
* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [link1](https://github.com/owner1/repo) - link 1 text
* [site](https://example.com/x) - not a repository
"
        );
        assert_eq!(outcome.links, 2);
        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.reordered_lists, 1);
    }

    #[tokio::test]
    async fn test_equal_counts_keep_order_and_are_all_marked() {
        let provider = StaticProvider::new([("o/a", 10), ("o/b", 10), ("o/c", 10)]);
        let manager = Manager::new(provider, MemoryCache::default());
        let source = "\
* [a](https://github.com/o/a)
* [b](https://github.com/o/b)
* [c](https://github.com/o/c)

## Next
";

        let outcome = manager
            .process(source.as_bytes(), "", &NoPrune)
            .await
            .unwrap();

        assert_eq!(
            outcome.markdown,
            "\
* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [a](https://github.com/o/a)
* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [b](https://github.com/o/b)
* <code>&nbsp;&nbsp;&nbsp;&nbsp;10</code> [c](https://github.com/o/c)

## Next
"
        );
        assert_eq!(outcome.reordered_lists, 0);
    }

    #[tokio::test]
    async fn test_resorted_list_keeps_following_blocks() {
        let provider = StaticProvider::new([("o/a", 1), ("o/b", 2), ("o/c", 3)]);
        let manager = Manager::new(provider, MemoryCache::default());
        let source = "\
1. [a](https://github.com/o/a)
2. [b][b]
3. [c](https://github.com/o/c)

Footer paragraph.

[b]: https://github.com/o/b
";

        let outcome = manager
            .process(source.as_bytes(), "", &NoPrune)
            .await
            .unwrap();

        assert_eq!(
            outcome.markdown,
            "\
1. <code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;3</code> [c](https://github.com/o/c)
2. <code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;2</code> [b][b]
3. <code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;1</code> [a](https://github.com/o/a)

Footer paragraph.

[b]: https://github.com/o/b
"
        );
        assert_eq!(outcome.links, 3);
        assert_eq!(outcome.reordered_lists, 1);
    }

    #[tokio::test]
    async fn test_about_is_prepended() {
        let manager = Manager::new(StaticProvider::new([]), MemoryCache::default());

        let outcome = manager
            .process(b"# List\n", "> Sorted by stars.\n\n", &NoPrune)
            .await
            .unwrap();

        assert_eq!(outcome.markdown, "> Sorted by stars.\n\n# List\n");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let manager = Manager::new(StaticProvider::new([]), MemoryCache::default());

        let result = manager.process(&[0xff, 0xfe], "", &NoPrune).await;

        assert!(matches!(result, Err(StarlistError::Encoding(_))));
    }
}
