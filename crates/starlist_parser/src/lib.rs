//! # starlist_parser
//!
//! Markdown parsing and rendering for starlist.
//!
//! This crate provides:
//! - A `Parser` trait for implementing custom parsers
//! - A Markdown parser built on `markdown-rs` (GFM)
//! - A renderer that writes a possibly modified tree back to Markdown,
//!   reproducing every untouched region of the source byte for byte
//!
//! ## Example
//!
//! ```rust
//! use starlist_parser::{MarkdownParser, MarkdownRenderer, Parser};
//!
//! let source = "# Hello\n\n* [a](https://github.com/a/b)\n";
//! let tree = MarkdownParser::new().parse(source).unwrap();
//! let out = MarkdownRenderer::new().render(source, &tree).unwrap();
//!
//! assert_eq!(out, source);
//! ```

mod error;
mod layout;
mod markdown;
mod renderer;
mod traits;

pub use error::{ParseError, RenderError};
pub use markdown::MarkdownParser;
pub use renderer::MarkdownRenderer;
pub use traits::Parser;
