//! Helper functions for the lexer.
//!
//! - State transitions ("switch to", "reconsume in")
//! - Section bookkeeping and event emission
//! - Buffer compaction between chunks
//! - End-of-input handling of half-read constructs

use log::debug;

use super::core::{Lexer, LexerState};
use super::event::{LexEvent, LexSink, Span};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Lexer {
    /// Transitions to a new state. The next byte is examined on the next
    /// iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: LexerState) {
        self.state = new_state;
    }

    /// Transitions to a new state without consuming the current byte.
    pub(super) const fn reconsume_in(&mut self, new_state: LexerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Section Helpers
// =============================================================================

impl Lexer {
    /// Absolute offset of a buffer-relative index.
    pub(super) const fn absolute(&self, relative: usize) -> usize {
        self.buffer_offset + relative
    }

    /// The current section up to (not including) `end`.
    pub(super) fn section_to(&self, end: usize) -> &str {
        let start = self.section_start.unwrap_or(end);
        self.buffer.get(start..end).unwrap_or_default()
    }

    /// Take the current section up to the current byte and clear it.
    pub(super) fn take_section(&mut self) -> String {
        let section = self.section_to(self.index).to_string();
        self.section_start = None;
        section
    }

    /// Span from the current tag's `<` through the current byte.
    pub(super) const fn markup_span(&self) -> Span {
        Span::new(self.tag_start, self.position() + 1)
    }
}

// =============================================================================
// Emission Helpers
// =============================================================================

impl Lexer {
    /// Emit pending character data, if any.
    pub(super) fn emit_text_section<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        let Some(start) = self.section_start else {
            return;
        };
        if self.index > start {
            let data = self.section_to(self.index).to_string();
            let span = Span::new(self.absolute(start), self.position());
            sink.lex(LexEvent::Text { data, span });
        }
    }

    /// Emit the pending piece of an attribute value, if any.
    pub(super) fn emit_attribute_data<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        let value = self.take_section();
        if !value.is_empty() {
            sink.lex(LexEvent::AttributeData { value });
        }
    }

    /// Emit the end of an opening tag and return to text.
    pub(super) fn emit_open_tag_end<S: LexSink + ?Sized>(
        &mut self,
        self_closing: bool,
        sink: &mut S,
    ) {
        sink.lex(LexEvent::OpenTagEnd {
            self_closing,
            end: self.position() + 1,
        });
        self.switch_to(LexerState::Text);
        self.section_start = Some(self.index + 1);
    }

    /// Emit decoded reference text into whatever the reference was part of.
    /// `end` is the buffer index just past the reference.
    pub(super) fn emit_partial<S: LexSink + ?Sized>(
        &mut self,
        value: &str,
        end: usize,
        sink: &mut S,
    ) {
        let start = self.section_start.unwrap_or(end);
        if self.base_state == LexerState::Text {
            sink.lex(LexEvent::Text {
                data: value.to_string(),
                span: Span::new(self.absolute(start), self.absolute(end)),
            });
        } else {
            sink.lex(LexEvent::AttributeData {
                value: value.to_string(),
            });
        }
        self.section_start = Some(end);
    }
}

// =============================================================================
// Buffer Management
// =============================================================================

impl Lexer {
    /// Drop the consumed prefix of the buffer. Only the current section
    /// is kept, so memory stays bounded by the longest single construct.
    pub(super) fn cleanup(&mut self) {
        let keep_from = self.section_start.unwrap_or(self.index).min(self.index);
        if keep_from == 0 {
            return;
        }
        self.buffer.replace_range(..keep_from, "");
        self.buffer_offset += keep_from;
        self.index -= keep_from;
        if let Some(start) = self.section_start.as_mut() {
            *start -= keep_from;
        }
    }

    /// Resolve whatever construct was still open when input ended.
    ///
    /// Open comments and CDATA sections are emitted as such, half-read
    /// tags are dropped, and everything else becomes text.
    pub(super) fn flush_trailing_data<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        if self.is_in_entity() {
            self.flush_entity(sink);
            self.switch_to(self.base_state);
        }
        let end = self.buffer.len();
        let start = self.section_start.unwrap_or(end);
        let data = self.buffer.get(start..end).unwrap_or_default().to_string();
        let tail = Span::new(self.absolute(start), self.absolute(end));
        match self.state {
            LexerState::InComment | LexerState::AfterComment1 | LexerState::AfterComment2 => {
                let span = Span::new(self.tag_start, tail.end);
                sink.lex(LexEvent::Comment { data, span });
            }
            LexerState::InCdata | LexerState::AfterCdata1 | LexerState::AfterCdata2 => {
                let span = Span::new(self.tag_start, tail.end);
                sink.lex(LexEvent::Cdata { data, span });
            }
            LexerState::BeforeDeclaration
            | LexerState::InDeclaration
            | LexerState::BeforeComment
            | LexerState::BeforeCdata => {
                let span = Span::new(self.tag_start, tail.end);
                sink.lex(LexEvent::Text {
                    data: format!("<!{data}"),
                    span,
                });
            }
            LexerState::InProcessingInstruction => {
                let span = Span::new(self.tag_start, tail.end);
                sink.lex(LexEvent::Text {
                    data: format!("<?{data}"),
                    span,
                });
            }
            LexerState::Text
            | LexerState::BeforeTagName
            | LexerState::BeforeClosingTagName
            | LexerState::AfterSpecialName => {
                if !data.is_empty() {
                    sink.lex(LexEvent::Text { data, span: tail });
                }
            }
            state => {
                debug!("dropping unterminated tag at offset {} ({state})", self.tag_start);
            }
        }
        self.section_start = None;
    }
}
