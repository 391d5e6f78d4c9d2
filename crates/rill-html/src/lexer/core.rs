use log::trace;
use strum_macros::Display;

use super::event::{LexEvent, LexSink};
use crate::error::ParseError;
use crate::options::ParserOptions;

/// The lexer state machine.
///
/// Each state names the construct being read; the byte that caused the
/// transition has already been consumed unless a handler reconsumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LexerState {
    /// Character data between tags.
    Text,
    /// Just read `<`.
    BeforeTagName,
    /// Reading an opening tag's name.
    InTagName,
    /// Read `/` inside an opening tag.
    InSelfClosingTag,
    /// Just read `</`.
    BeforeClosingTagName,
    /// Reading a closing tag's name.
    InClosingTagName,
    /// Closing tag name read; skipping to `>`.
    AfterClosingTagName,
    /// Between attributes.
    BeforeAttributeName,
    /// Reading an attribute name.
    InAttributeName,
    /// Attribute name read; `=` may follow.
    AfterAttributeName,
    /// Read `=`; skipping to the value.
    BeforeAttributeValue,
    /// Inside a `"`-quoted value.
    InAttributeValueDoubleQuoted,
    /// Inside a `'`-quoted value.
    InAttributeValueSingleQuoted,
    /// Inside an unquoted value.
    InAttributeValueUnquoted,
    /// Just read `<!`.
    BeforeDeclaration,
    /// Inside `<!...>`.
    InDeclaration,
    /// Inside `<?...>`.
    InProcessingInstruction,
    /// Read `<!-`.
    BeforeComment,
    /// Inside a comment.
    InComment,
    /// Read one `-` inside a comment.
    AfterComment1,
    /// Read `--` inside a comment.
    AfterComment2,
    /// Matching the `CDATA[` keyword after `<![`.
    BeforeCdata,
    /// Inside a CDATA section.
    InCdata,
    /// Read one `]` inside a CDATA section.
    AfterCdata1,
    /// Read `]]` inside a CDATA section.
    AfterCdata2,
    /// Read `<s`; the tag may be `script` or `style`.
    BeforeSpecial,
    /// Matching the rest of `script` or `style` in an opening tag.
    InSpecialName,
    /// Matching the raw text element's name after `</` in raw text.
    AfterSpecialName,
    /// Read `&`.
    BeforeEntity,
    /// Read `&#`.
    BeforeNumericEntity,
    /// Reading a named reference.
    InNamedEntity,
    /// Reading decimal digits of a numeric reference.
    InNumericEntity,
    /// Reading hex digits of a numeric reference.
    InHexEntity,
}

/// Elements whose content is read as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTextElement {
    /// `<script>`
    Script,
    /// `<style>`
    Style,
}

impl RawTextElement {
    /// The lowercase tag name.
    #[must_use]
    pub const fn name(self) -> &'static [u8] {
        match self {
            Self::Script => b"script",
            Self::Style => b"style",
        }
    }
}

/// Incremental lexer.
///
/// Input arrives through [`write`](Self::write) in chunks of any size. The
/// unconsumed tail of the input is buffered, so a construct split across
/// chunks produces the same events as if it had arrived whole.
#[derive(Debug)]
pub struct Lexer {
    pub(super) state: LexerState,
    /// State to return to once a character reference is resolved.
    pub(super) base_state: LexerState,
    pub(super) raw_text: Option<RawTextElement>,
    /// Candidate raw text element while matching its name.
    pub(super) raw_text_candidate: Option<RawTextElement>,
    /// Bytes of a keyword (`script`, `style`, `CDATA[`) matched so far.
    pub(super) matched: usize,
    pub(super) buffer: String,
    /// Absolute offset of `buffer[0]`.
    pub(super) buffer_offset: usize,
    pub(super) index: usize,
    /// Start of the construct being read, relative to `buffer`.
    pub(super) section_start: Option<usize>,
    /// Absolute offset of the `<` that opened the current tag.
    pub(super) tag_start: usize,
    pub(super) pending_close: Option<String>,
    // When true, the main loop does not advance past the current byte.
    pub(super) reconsume: bool,
    pub(super) running: bool,
    pub(super) ended: bool,
    pub(super) finished: bool,
    pub(super) xml_mode: bool,
    pub(super) decode_entities: bool,
}

impl Lexer {
    /// Create a lexer configured from the parser options.
    #[must_use]
    pub const fn new(options: &ParserOptions) -> Self {
        Self {
            state: LexerState::Text,
            base_state: LexerState::Text,
            raw_text: None,
            raw_text_candidate: None,
            matched: 0,
            buffer: String::new(),
            buffer_offset: 0,
            index: 0,
            section_start: Some(0),
            tag_start: 0,
            pending_close: None,
            reconsume: false,
            running: true,
            ended: false,
            finished: false,
            xml_mode: options.xml_mode,
            decode_entities: options.decode_entities,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LexerState {
        self.state
    }

    /// Absolute offset of the next byte to be examined.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.buffer_offset + self.index
    }

    /// True while writes are buffered instead of processed.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        !self.running
    }

    /// True once [`end`](Self::end) has been called.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Feed the next chunk of input.
    ///
    /// Writing after [`end`](Self::end) reports
    /// [`ParseError::WriteAfterEnd`] to the sink and ignores the chunk.
    pub fn write<S: LexSink + ?Sized>(&mut self, chunk: &str, sink: &mut S) {
        if self.ended {
            sink.lex(LexEvent::Error(ParseError::WriteAfterEnd));
            return;
        }
        self.buffer.push_str(chunk);
        trace!(
            "chunk of {} bytes at offset {} in state {}",
            chunk.len(),
            self.buffer_offset + self.buffer.len() - chunk.len(),
            self.state
        );
        if self.running {
            self.parse(sink);
        }
    }

    /// Signal end of input. Flushes trailing data and emits
    /// [`LexEvent::End`]. Calling it again does nothing.
    pub fn end<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        if self.ended {
            return;
        }
        self.ended = true;
        if self.running {
            self.finish(sink);
        }
    }

    /// Stop processing; later writes are buffered until
    /// [`resume`](Self::resume). A sink can also pause from inside a
    /// write through [`LexSink::should_pause`].
    pub const fn pause(&mut self) {
        self.running = false;
    }

    /// Process everything buffered while paused, and finish if
    /// [`end`](Self::end) was called in the meantime.
    pub fn resume<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        if self.running {
            return;
        }
        self.running = true;
        if self.index < self.buffer.len() {
            self.parse(sink);
        }
        if self.running && self.ended && !self.finished {
            self.finish(sink);
        }
    }

    /// Forget all input and state, keeping the configuration.
    pub fn reset(&mut self) {
        let xml_mode = self.xml_mode;
        let decode_entities = self.decode_entities;
        *self = Self::new(&ParserOptions {
            xml_mode,
            decode_entities,
            ..ParserOptions::default()
        });
    }

    fn parse<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        while self.running && self.index < self.buffer.len() {
            let c = self.buffer.as_bytes()[self.index];
            self.step(c, sink);
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.index += 1;
            }
            if sink.should_pause() {
                trace!("paused by sink at offset {}", self.position());
                self.running = false;
            }
        }
        self.cleanup();
    }

    fn finish<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        self.finished = true;
        self.flush_trailing_data(sink);
        sink.lex(LexEvent::End {
            offset: self.buffer_offset + self.buffer.len(),
        });
    }

    fn step<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match self.state {
            LexerState::Text => self.handle_text_state(c, sink),
            LexerState::BeforeTagName => self.handle_before_tag_name_state(c, sink),
            LexerState::InTagName => self.handle_in_tag_name_state(c, sink),
            LexerState::InSelfClosingTag => self.handle_in_self_closing_tag_state(c, sink),
            LexerState::BeforeClosingTagName => self.handle_before_closing_tag_name_state(c),
            LexerState::InClosingTagName => self.handle_in_closing_tag_name_state(c, sink),
            LexerState::AfterClosingTagName => self.handle_after_closing_tag_name_state(c, sink),
            LexerState::BeforeAttributeName => self.handle_before_attribute_name_state(c, sink),
            LexerState::InAttributeName => self.handle_in_attribute_name_state(c, sink),
            LexerState::AfterAttributeName => self.handle_after_attribute_name_state(c, sink),
            LexerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
            LexerState::InAttributeValueDoubleQuoted => {
                self.handle_in_quoted_attribute_value_state(c, b'"', sink);
            }
            LexerState::InAttributeValueSingleQuoted => {
                self.handle_in_quoted_attribute_value_state(c, b'\'', sink);
            }
            LexerState::InAttributeValueUnquoted => {
                self.handle_in_unquoted_attribute_value_state(c, sink);
            }
            LexerState::BeforeDeclaration => self.handle_before_declaration_state(c),
            LexerState::InDeclaration => self.handle_in_declaration_state(c, sink),
            LexerState::InProcessingInstruction => {
                self.handle_in_processing_instruction_state(c, sink);
            }
            LexerState::BeforeComment => self.handle_before_comment_state(c),
            LexerState::InComment => self.handle_in_comment_state(c),
            LexerState::AfterComment1 => self.handle_after_comment_1_state(c),
            LexerState::AfterComment2 => self.handle_after_comment_2_state(c, sink),
            LexerState::BeforeCdata => self.handle_before_cdata_state(c),
            LexerState::InCdata => self.handle_in_cdata_state(c),
            LexerState::AfterCdata1 => self.handle_after_cdata_1_state(c),
            LexerState::AfterCdata2 => self.handle_after_cdata_2_state(c, sink),
            LexerState::BeforeSpecial => self.handle_before_special_state(c),
            LexerState::InSpecialName => self.handle_in_special_name_state(c),
            LexerState::AfterSpecialName => self.handle_after_special_name_state(c),
            LexerState::BeforeEntity => self.handle_before_entity_state(c),
            LexerState::BeforeNumericEntity => self.handle_before_numeric_entity_state(c),
            LexerState::InNamedEntity => self.handle_in_named_entity_state(c, sink),
            LexerState::InNumericEntity => self.handle_in_numeric_entity_state(c, sink),
            LexerState::InHexEntity => self.handle_in_hex_entity_state(c, sink),
        }
    }

    fn handle_text_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'<' => {
                self.emit_text_section(sink);
                self.tag_start = self.position();
                self.section_start = Some(self.index);
                self.switch_to(LexerState::BeforeTagName);
            }
            b'&' if self.decode_entities && self.raw_text.is_none() => {
                self.emit_text_section(sink);
                self.begin_entity(LexerState::Text);
            }
            _ => {}
        }
    }

    fn handle_before_tag_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'/' => self.switch_to(LexerState::BeforeClosingTagName),
            // "<<": the first `<` is text, the second may open a tag.
            b'<' => {
                self.emit_text_section(sink);
                self.tag_start = self.position();
                self.section_start = Some(self.index);
            }
            _ if c == b'>' || self.raw_text.is_some() || is_whitespace(c) => {
                self.switch_to(LexerState::Text);
            }
            b'!' => {
                self.switch_to(LexerState::BeforeDeclaration);
                self.section_start = Some(self.index + 1);
            }
            b'?' => {
                self.switch_to(LexerState::InProcessingInstruction);
                self.section_start = Some(self.index + 1);
            }
            b's' | b'S' if !self.xml_mode => {
                self.switch_to(LexerState::BeforeSpecial);
                self.section_start = Some(self.index);
            }
            _ => {
                self.switch_to(LexerState::InTagName);
                self.section_start = Some(self.index);
            }
        }
    }

    fn handle_in_tag_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b'/' || c == b'>' || is_whitespace(c) {
            let name = self.take_section();
            sink.lex(LexEvent::OpenTagName {
                name,
                start: self.tag_start,
            });
            self.reconsume_in(LexerState::BeforeAttributeName);
        }
    }

    fn handle_before_attribute_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'>' => self.emit_open_tag_end(false, sink),
            b'/' => self.switch_to(LexerState::InSelfClosingTag),
            _ if is_whitespace(c) => {}
            _ => {
                self.switch_to(LexerState::InAttributeName);
                self.section_start = Some(self.index);
            }
        }
    }

    fn handle_in_self_closing_tag_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'>' => self.emit_open_tag_end(true, sink),
            _ if is_whitespace(c) => {}
            _ => self.reconsume_in(LexerState::BeforeAttributeName),
        }
    }

    fn handle_in_attribute_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b'=' || c == b'/' || c == b'>' || is_whitespace(c) {
            let name = self.take_section();
            sink.lex(LexEvent::AttributeName { name });
            self.reconsume_in(LexerState::AfterAttributeName);
        }
    }

    fn handle_after_attribute_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'=' => self.switch_to(LexerState::BeforeAttributeValue),
            b'/' | b'>' => {
                sink.lex(LexEvent::AttributeEnd);
                self.reconsume_in(LexerState::BeforeAttributeName);
            }
            _ if is_whitespace(c) => {}
            // Valueless attribute followed by another attribute.
            _ => {
                sink.lex(LexEvent::AttributeEnd);
                self.switch_to(LexerState::InAttributeName);
                self.section_start = Some(self.index);
            }
        }
    }

    fn handle_before_attribute_value_state(&mut self, c: u8) {
        match c {
            b'"' => {
                self.switch_to(LexerState::InAttributeValueDoubleQuoted);
                self.section_start = Some(self.index + 1);
            }
            b'\'' => {
                self.switch_to(LexerState::InAttributeValueSingleQuoted);
                self.section_start = Some(self.index + 1);
            }
            _ if is_whitespace(c) => {}
            _ => {
                self.section_start = Some(self.index);
                self.reconsume_in(LexerState::InAttributeValueUnquoted);
            }
        }
    }

    fn handle_in_quoted_attribute_value_state<S: LexSink + ?Sized>(
        &mut self,
        c: u8,
        quote: u8,
        sink: &mut S,
    ) {
        if c == quote {
            self.emit_attribute_data(sink);
            sink.lex(LexEvent::AttributeEnd);
            self.switch_to(LexerState::BeforeAttributeName);
        } else if c == b'&' && self.decode_entities {
            self.emit_attribute_data(sink);
            self.begin_entity(self.state);
        }
    }

    fn handle_in_unquoted_attribute_value_state<S: LexSink + ?Sized>(
        &mut self,
        c: u8,
        sink: &mut S,
    ) {
        if c == b'>' || is_whitespace(c) {
            self.emit_attribute_data(sink);
            sink.lex(LexEvent::AttributeEnd);
            self.reconsume_in(LexerState::BeforeAttributeName);
        } else if c == b'&' && self.decode_entities {
            self.emit_attribute_data(sink);
            self.begin_entity(self.state);
        }
    }

    fn handle_before_closing_tag_name_state(&mut self, c: u8) {
        match c {
            _ if is_whitespace(c) => {}
            b'>' => self.switch_to(LexerState::Text),
            b's' | b'S' if self.raw_text.is_some() => {
                self.matched = 1;
                self.switch_to(LexerState::AfterSpecialName);
            }
            // Inside raw text only the element's own closing tag counts.
            _ if self.raw_text.is_some() => self.reconsume_in(LexerState::Text),
            _ => {
                self.switch_to(LexerState::InClosingTagName);
                self.section_start = Some(self.index);
            }
        }
    }

    fn handle_in_closing_tag_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b'>' || c == b'/' || is_whitespace(c) {
            self.pending_close = Some(self.take_section());
            if c == b'>' {
                self.handle_after_closing_tag_name_state(c, sink);
            } else {
                self.switch_to(LexerState::AfterClosingTagName);
            }
        }
    }

    fn handle_after_closing_tag_name_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b'>' {
            let span = self.markup_span();
            if let Some(name) = self.pending_close.take() {
                sink.lex(LexEvent::CloseTag { name, span });
            }
            self.switch_to(LexerState::Text);
            self.section_start = Some(self.index + 1);
        }
    }

    fn handle_before_declaration_state(&mut self, c: u8) {
        match c {
            b'[' => {
                self.matched = 0;
                self.switch_to(LexerState::BeforeCdata);
            }
            b'-' => self.switch_to(LexerState::BeforeComment),
            _ => self.reconsume_in(LexerState::InDeclaration),
        }
    }

    fn handle_in_declaration_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b'>' {
            let data = self.section_to(self.index).to_string();
            let span = self.markup_span();
            sink.lex(LexEvent::Declaration { data, span });
            self.switch_to(LexerState::Text);
            self.section_start = Some(self.index + 1);
        }
    }

    fn handle_in_processing_instruction_state<S: LexSink + ?Sized>(
        &mut self,
        c: u8,
        sink: &mut S,
    ) {
        if c == b'>' {
            let data = self.section_to(self.index).to_string();
            let span = self.markup_span();
            sink.lex(LexEvent::ProcessingInstruction { data, span });
            self.switch_to(LexerState::Text);
            self.section_start = Some(self.index + 1);
        }
    }

    fn handle_before_comment_state(&mut self, c: u8) {
        if c == b'-' {
            self.switch_to(LexerState::InComment);
            self.section_start = Some(self.index + 1);
        } else {
            self.reconsume_in(LexerState::InDeclaration);
        }
    }

    fn handle_in_comment_state(&mut self, c: u8) {
        if c == b'-' {
            self.switch_to(LexerState::AfterComment1);
        }
    }

    fn handle_after_comment_1_state(&mut self, c: u8) {
        if c == b'-' {
            self.switch_to(LexerState::AfterComment2);
        } else {
            self.switch_to(LexerState::InComment);
        }
    }

    fn handle_after_comment_2_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'>' => {
                let data = self.section_to(self.index - 2).to_string();
                let span = self.markup_span();
                sink.lex(LexEvent::Comment { data, span });
                self.switch_to(LexerState::Text);
                self.section_start = Some(self.index + 1);
            }
            // "--->" still ends the comment.
            b'-' => {}
            _ => self.switch_to(LexerState::InComment),
        }
    }

    fn handle_before_cdata_state(&mut self, c: u8) {
        const KEYWORD: &[u8] = b"CDATA[";
        if c.eq_ignore_ascii_case(&KEYWORD[self.matched]) {
            self.matched += 1;
            if self.matched == KEYWORD.len() {
                self.switch_to(LexerState::InCdata);
                self.section_start = Some(self.index + 1);
            }
        } else {
            self.reconsume_in(LexerState::InDeclaration);
        }
    }

    fn handle_in_cdata_state(&mut self, c: u8) {
        if c == b']' {
            self.switch_to(LexerState::AfterCdata1);
        }
    }

    fn handle_after_cdata_1_state(&mut self, c: u8) {
        if c == b']' {
            self.switch_to(LexerState::AfterCdata2);
        } else {
            self.switch_to(LexerState::InCdata);
        }
    }

    fn handle_after_cdata_2_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        match c {
            b'>' => {
                let data = self.section_to(self.index - 2).to_string();
                let span = self.markup_span();
                sink.lex(LexEvent::Cdata { data, span });
                self.switch_to(LexerState::Text);
                self.section_start = Some(self.index + 1);
            }
            b']' => {}
            _ => self.switch_to(LexerState::InCdata),
        }
    }

    fn handle_before_special_state(&mut self, c: u8) {
        let candidate = match c {
            b'c' | b'C' => RawTextElement::Script,
            b't' | b'T' => RawTextElement::Style,
            _ => {
                self.reconsume_in(LexerState::InTagName);
                return;
            }
        };
        self.raw_text_candidate = Some(candidate);
        self.matched = 2;
        self.switch_to(LexerState::InSpecialName);
    }

    fn handle_in_special_name_state(&mut self, c: u8) {
        let Some(candidate) = self.raw_text_candidate else {
            self.reconsume_in(LexerState::InTagName);
            return;
        };
        let name = candidate.name();
        if self.matched < name.len() {
            if c.eq_ignore_ascii_case(&name[self.matched]) {
                self.matched += 1;
            } else {
                self.raw_text_candidate = None;
                self.reconsume_in(LexerState::InTagName);
            }
            return;
        }
        if c == b'/' || c == b'>' || is_whitespace(c) {
            self.raw_text = Some(candidate);
        }
        self.raw_text_candidate = None;
        self.reconsume_in(LexerState::InTagName);
    }

    fn handle_after_special_name_state(&mut self, c: u8) {
        let Some(element) = self.raw_text else {
            self.reconsume_in(LexerState::Text);
            return;
        };
        let name = element.name();
        if self.matched < name.len() {
            if c.eq_ignore_ascii_case(&name[self.matched]) {
                self.matched += 1;
            } else {
                self.reconsume_in(LexerState::Text);
            }
            return;
        }
        if c == b'>' || is_whitespace(c) {
            self.raw_text = None;
            self.section_start = Some(self.index - name.len());
            self.reconsume_in(LexerState::InClosingTagName);
        } else {
            self.reconsume_in(LexerState::Text);
        }
    }
}

/// Whitespace as far as markup is concerned.
#[must_use]
pub const fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}
