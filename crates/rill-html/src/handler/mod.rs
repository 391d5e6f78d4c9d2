//! Structural event consumers.
//!
//! The parser reports what it sees through the [`Handler`] trait. Every
//! method has an empty default, so a handler implements only the events it
//! cares about. [`DomHandler`] is the stock implementation that builds a
//! [`DomTree`](rill_dom::DomTree).

/// Tree-building handler.
pub mod dom;

pub use dom::DomHandler;

use rill_dom::AttributesMap;

use crate::error::ParseError;
use crate::lexer::Span;

/// Receiver of structural parse events.
///
/// Ordering guarantees: every `on_open_tag` is matched by exactly one later
/// `on_close_tag` for the same name, properly nested, before `on_end`.
/// `on_comment` is always followed by `on_comment_end`, and
/// `on_cdata_start` by the section's text and `on_cdata_end`.
pub trait Handler {
    /// The parser was reset and is about to see a new document.
    fn on_reset(&mut self) {}

    /// An opening tag's name has been read. Implied closes caused by it
    /// have already been reported.
    fn on_open_tag_name(&mut self, _name: &str) {}

    /// An attribute of the current opening tag. Reported for every
    /// occurrence, including duplicates that the element will not keep.
    fn on_attribute(&mut self, _name: &str, _value: &str) {}

    /// An element was opened. `attrs` holds the first value of each name.
    fn on_open_tag(&mut self, _name: &str, _attrs: AttributesMap, _span: Span) {}

    /// The innermost open element was closed.
    fn on_close_tag(&mut self, _name: &str, _span: Span) {}

    /// Character data.
    fn on_text(&mut self, _text: &str, _span: Span) {}

    /// Comment text. May be called more than once before `on_comment_end`.
    fn on_comment(&mut self, _data: &str, _span: Span) {}

    /// The current comment is complete.
    fn on_comment_end(&mut self, _span: Span) {}

    /// A CDATA section begins. Its content arrives through `on_text`.
    fn on_cdata_start(&mut self, _span: Span) {}

    /// The current CDATA section is complete.
    fn on_cdata_end(&mut self, _span: Span) {}

    /// A declaration (`name` starts with `!`) or processing instruction
    /// (`name` starts with `?`). `data` is the raw content with the same
    /// leading marker.
    fn on_processing_instruction(&mut self, _name: &str, _data: &str, _span: Span) {}

    /// A fatal condition.
    fn on_error(&mut self, _error: ParseError) {}

    /// The document is complete. Called once per document.
    fn on_end(&mut self) {}

    /// Asked after every input byte. Returning true pauses the parser
    /// immediately, even in the middle of a chunk; nothing more is reported
    /// until [`Parser::resume`](crate::Parser::resume). A handler usually
    /// sets a flag in one of its callbacks and clears it here.
    fn should_pause(&mut self) -> bool {
        false
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_reset(&mut self) {
        (**self).on_reset();
    }

    fn on_open_tag_name(&mut self, name: &str) {
        (**self).on_open_tag_name(name);
    }

    fn on_attribute(&mut self, name: &str, value: &str) {
        (**self).on_attribute(name, value);
    }

    fn on_open_tag(&mut self, name: &str, attrs: AttributesMap, span: Span) {
        (**self).on_open_tag(name, attrs, span);
    }

    fn on_close_tag(&mut self, name: &str, span: Span) {
        (**self).on_close_tag(name, span);
    }

    fn on_text(&mut self, text: &str, span: Span) {
        (**self).on_text(text, span);
    }

    fn on_comment(&mut self, data: &str, span: Span) {
        (**self).on_comment(data, span);
    }

    fn on_comment_end(&mut self, span: Span) {
        (**self).on_comment_end(span);
    }

    fn on_cdata_start(&mut self, span: Span) {
        (**self).on_cdata_start(span);
    }

    fn on_cdata_end(&mut self, span: Span) {
        (**self).on_cdata_end(span);
    }

    fn on_processing_instruction(&mut self, name: &str, data: &str, span: Span) {
        (**self).on_processing_instruction(name, data, span);
    }

    fn on_error(&mut self, error: ParseError) {
        (**self).on_error(error);
    }

    fn on_end(&mut self) {
        (**self).on_end();
    }

    fn should_pause(&mut self) -> bool {
        (**self).should_pause()
    }
}
