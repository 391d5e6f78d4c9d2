//! Streaming, error-tolerant HTML/XML parsing.
//!
//! # Layers
//!
//! - **Lexer** ([`lexer`]): chunked input to a flat stream of
//!   [`LexEvent`]s. Handles raw text in `<script>`/`<style>`, comments,
//!   CDATA, declarations, processing instructions and character references.
//!
//! - **Parser** ([`parser`]): lexical events to balanced structural events
//!   delivered to a [`Handler`]. Repairs nesting with implied closes, void
//!   elements and stray-close recovery; never rejects input.
//!
//! - **Tree builder** ([`DomHandler`]): structural events to a
//!   [`DomTree`], with optional source offsets and whitespace
//!   normalization.
//!
//! # Not Implemented
//!
//! - The WHATWG tree construction algorithm (insertion modes, adoption agency)
//! - Encoding detection; input is already `&str`
//! - Serializing a tree back to markup

/// Errors reported through [`Handler::on_error`].
pub mod error;
/// Structural event consumers, including the tree builder.
pub mod handler;
/// Incremental lexer.
pub mod lexer;
/// Parser and tree builder configuration.
pub mod options;
/// Structural parser.
pub mod parser;
/// Debug rendering of trees.
pub mod print;

pub use error::ParseError;
pub use handler::{DomHandler, Handler};
pub use lexer::{LexEvent, LexSink, Lexer, LexerState, Span};
pub use options::{DomHandlerOptions, ParserOptions};
pub use parser::Parser;
pub use print::{format_tree, print_tree};
pub use rill_dom::DomTree;

/// Parse a complete document into a tree.
///
/// # Errors
///
/// Returns the first [`ParseError`] reported while building the tree.
///
/// # Example
/// ```
/// use rill_html::{DomHandlerOptions, ParserOptions, parse_document};
///
/// let tree = parse_document("<p>a<br>b", &ParserOptions::new(), DomHandlerOptions::new())
///     .unwrap();
/// let p = tree.find_element("p").unwrap();
/// assert_eq!(tree.children(p).len(), 3);
/// ```
pub fn parse_document(
    input: &str,
    options: &ParserOptions,
    dom_options: DomHandlerOptions,
) -> Result<DomTree, ParseError> {
    let mut parser = Parser::new(DomHandler::new(dom_options), options.clone());
    parser.end_with(input);
    parser.into_handler().into_result()
}
