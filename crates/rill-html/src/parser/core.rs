use super::structure::Structure;
use crate::handler::Handler;
use crate::lexer::Lexer;
use crate::options::ParserOptions;

/// Streaming parser.
///
/// Owns a [`Lexer`] and the structural state, and reports to a
/// [`Handler`]. Input may be written in any number of chunks; the events
/// the handler sees do not depend on where the chunks were split.
///
/// # Example
/// ```
/// use rill_html::{DomHandler, DomHandlerOptions, Parser, ParserOptions};
///
/// let mut parser = Parser::new(DomHandler::new(DomHandlerOptions::new()), ParserOptions::new());
/// parser.write("<ul><li>one<li>tw");
/// parser.write("o</ul>");
/// parser.end();
/// let tree = parser.into_handler().into_result().unwrap();
/// assert_eq!(tree.roots().len(), 1);
/// ```
#[derive(Debug)]
pub struct Parser<H> {
    lexer: Lexer,
    structure: Structure<H>,
}

impl<H: Handler> Parser<H> {
    /// Create a parser reporting to `handler`.
    #[must_use]
    pub fn new(handler: H, options: ParserOptions) -> Self {
        Self {
            lexer: Lexer::new(&options),
            structure: Structure::new(handler, options),
        }
    }

    /// Feed the next chunk of input.
    pub fn write(&mut self, chunk: &str) {
        self.lexer.write(chunk, &mut self.structure);
    }

    /// Signal end of input: flush trailing data, close everything still
    /// open, and call [`Handler::on_end`]. Calling it again does nothing.
    pub fn end(&mut self) {
        self.lexer.end(&mut self.structure);
    }

    /// Write a final chunk, then [`end`](Self::end).
    pub fn end_with(&mut self, chunk: &str) {
        self.write(chunk);
        self.end();
    }

    /// Stop processing. Writes are buffered and `end` is deferred until
    /// [`resume`](Self::resume).
    pub const fn pause(&mut self) {
        self.lexer.pause();
    }

    /// Continue after [`pause`](Self::pause), catching up on buffered input.
    pub fn resume(&mut self) {
        self.lexer.resume(&mut self.structure);
    }

    /// True while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.lexer.is_paused()
    }

    /// Discard all state and start a new document with the same handler
    /// and options. The handler sees [`Handler::on_reset`].
    pub fn reset(&mut self) {
        self.lexer.reset();
        self.structure.reset();
    }

    /// Reset, then parse `input` as one complete document.
    pub fn parse_complete(&mut self, input: &str) {
        self.reset();
        self.end_with(input);
    }

    /// Names of the currently open elements, outermost first.
    #[must_use]
    pub fn open_elements(&self) -> &[String] {
        &self.structure.stack
    }

    /// Absolute offset of the next byte the lexer will examine.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.lexer.position()
    }

    /// The options this parser was built with.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.structure.options
    }

    /// The handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.structure.handler
    }

    /// The handler, mutably.
    pub const fn handler_mut(&mut self) -> &mut H {
        &mut self.structure.handler
    }

    /// Consume the parser and return the handler.
    #[must_use]
    pub fn into_handler(self) -> H {
        self.structure.handler
    }
}
