//! Parser trait definition.

use starlist_ast::DocumentTree;

use crate::ParseError;

/// Trait for parsing source text into a [`DocumentTree`].
///
/// # Example
///
/// ```rust,ignore
/// use starlist_parser::Parser;
/// use starlist_ast::DocumentTree;
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn parse(&self, source: &str) -> Result<DocumentTree, ParseError> {
///         todo!()
///     }
/// }
/// ```
pub trait Parser {
    /// Parses the source text into a document tree.
    ///
    /// Every node of the returned tree that corresponds to source text must
    /// carry its byte span so the renderer can reproduce it verbatim.
    fn parse(&self, source: &str) -> Result<DocumentTree, ParseError>;
}
