//! Events produced by the lexer.

use std::fmt;

use crate::error::ParseError;

/// A half-open byte range `[start, end)` in the concatenated input.
///
/// Offsets count bytes of everything passed to `write` since the last
/// reset, so they stay valid across chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Span covering `[start, end)`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`. Used for closes that have no source
    /// text of their own (implied closes, closes at end of input).
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for zero-width spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Offset of the last byte covered, i.e. the inclusive end. A
    /// zero-width span reports the byte just before it.
    #[must_use]
    pub const fn last(&self) -> usize {
        self.end.saturating_sub(1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One lexical event.
///
/// Attribute events always arrive between an `OpenTagName` and the
/// matching `OpenTagEnd`. Text may be split into several consecutive
/// events (entity boundaries, stray `<`); consumers that care about
/// whole runs must join them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexEvent {
    /// A run of character data.
    Text {
        /// The characters, entity-decoded if decoding is enabled.
        data: String,
        /// Source range of the run.
        span: Span,
    },
    /// The name of an opening tag has been read.
    OpenTagName {
        /// Tag name exactly as written.
        name: String,
        /// Offset of the `<`.
        start: usize,
    },
    /// An attribute name inside an opening tag.
    AttributeName {
        /// Attribute name exactly as written.
        name: String,
    },
    /// A piece of the current attribute's value.
    AttributeData {
        /// Value fragment, entity-decoded if decoding is enabled.
        value: String,
    },
    /// The current attribute is complete.
    AttributeEnd,
    /// The opening tag is complete.
    OpenTagEnd {
        /// True if the tag ended with `/>`.
        self_closing: bool,
        /// Offset one past the `>`.
        end: usize,
    },
    /// A complete closing tag.
    CloseTag {
        /// Tag name exactly as written.
        name: String,
        /// Source range from `<` through `>`.
        span: Span,
    },
    /// A comment, without its `<!--` and `-->` delimiters.
    Comment {
        /// Comment text.
        data: String,
        /// Source range of the whole comment.
        span: Span,
    },
    /// A CDATA section, without its `<![CDATA[` and `]]>` delimiters.
    Cdata {
        /// Section content.
        data: String,
        /// Source range of the whole section.
        span: Span,
    },
    /// A `<!...>` declaration such as a doctype.
    Declaration {
        /// Everything between `<!` and `>`.
        data: String,
        /// Source range of the whole declaration.
        span: Span,
    },
    /// A `<?...>` processing instruction.
    ProcessingInstruction {
        /// Everything between `<?` and `>`.
        data: String,
        /// Source range of the whole instruction.
        span: Span,
    },
    /// The input is exhausted.
    End {
        /// Total number of bytes consumed.
        offset: usize,
    },
    /// The caller broke the streaming contract.
    Error(ParseError),
}

impl fmt::Display for LexEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { data, span } => write!(f, "Text({data:?}) @ {span}"),
            Self::OpenTagName { name, start } => write!(f, "OpenTagName({name}) @ {start}"),
            Self::AttributeName { name } => write!(f, "AttributeName({name})"),
            Self::AttributeData { value } => write!(f, "AttributeData({value:?})"),
            Self::AttributeEnd => write!(f, "AttributeEnd"),
            Self::OpenTagEnd { self_closing, end } => {
                if *self_closing {
                    write!(f, "OpenTagEnd(/>) @ {end}")
                } else {
                    write!(f, "OpenTagEnd(>) @ {end}")
                }
            }
            Self::CloseTag { name, span } => write!(f, "CloseTag({name}) @ {span}"),
            Self::Comment { data, span } => write!(f, "Comment({data:?}) @ {span}"),
            Self::Cdata { data, span } => write!(f, "Cdata({data:?}) @ {span}"),
            Self::Declaration { data, span } => write!(f, "Declaration({data:?}) @ {span}"),
            Self::ProcessingInstruction { data, span } => {
                write!(f, "ProcessingInstruction({data:?}) @ {span}")
            }
            Self::End { offset } => write!(f, "End @ {offset}"),
            Self::Error(err) => write!(f, "Error({err})"),
        }
    }
}

/// Receiver of lexical events.
pub trait LexSink {
    /// Handle one event.
    fn lex(&mut self, event: LexEvent);

    /// Polled after every byte the lexer consumes. Returning true pauses
    /// the lexer right there; the rest of the buffer waits for `resume`.
    fn should_pause(&mut self) -> bool {
        false
    }
}

impl LexSink for Vec<LexEvent> {
    fn lex(&mut self, event: LexEvent) {
        self.push(event);
    }
}
