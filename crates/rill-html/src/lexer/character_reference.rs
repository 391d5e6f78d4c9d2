//! Character reference states.
//!
//! A reference starts at `&` in text or in an attribute value. While it
//! is read, `section_start` stays on the `&`; once it resolves, the decoded
//! text is emitted into the surrounding construct and the section restarts
//! after the reference. Unresolvable references are left in place and end
//! up in the output literally.

use super::core::{Lexer, LexerState};
use super::event::LexSink;
use super::named_character_references::{
    decode_code_point, longest_legacy_prefix, lookup_entity, lookup_xml_entity,
};

impl Lexer {
    /// True while a character reference is being read.
    pub(super) const fn is_in_entity(&self) -> bool {
        matches!(
            self.state,
            LexerState::BeforeEntity
                | LexerState::BeforeNumericEntity
                | LexerState::InNamedEntity
                | LexerState::InNumericEntity
                | LexerState::InHexEntity
        )
    }

    /// Start a reference at the current `&`, returning to `base` afterwards.
    pub(super) const fn begin_entity(&mut self, base: LexerState) {
        self.base_state = base;
        self.section_start = Some(self.index);
        self.switch_to(LexerState::BeforeEntity);
    }

    pub(super) const fn handle_before_entity_state(&mut self, c: u8) {
        if c == b'#' {
            self.switch_to(LexerState::BeforeNumericEntity);
        } else {
            self.reconsume_in(LexerState::InNamedEntity);
        }
    }

    pub(super) const fn handle_before_numeric_entity_state(&mut self, c: u8) {
        if c == b'x' || c == b'X' {
            self.switch_to(LexerState::InHexEntity);
        } else {
            self.reconsume_in(LexerState::InNumericEntity);
        }
    }

    pub(super) fn handle_in_named_entity_state<S: LexSink + ?Sized>(
        &mut self,
        c: u8,
        sink: &mut S,
    ) {
        if c == b';' {
            self.resolve_named_entity(Some(c), sink);
            // The `;` belongs to the reference, decoded or not.
            self.switch_to(self.base_state);
        } else if !c.is_ascii_alphanumeric() {
            self.resolve_named_entity(Some(c), sink);
            self.reconsume_in(self.base_state);
        }
    }

    pub(super) fn handle_in_numeric_entity_state<S: LexSink + ?Sized>(
        &mut self,
        c: u8,
        sink: &mut S,
    ) {
        if c == b';' {
            self.decode_numeric_entity(10, true, sink);
            self.switch_to(self.base_state);
        } else if !c.is_ascii_digit() {
            if !self.xml_mode {
                self.decode_numeric_entity(10, false, sink);
            }
            self.reconsume_in(self.base_state);
        }
    }

    pub(super) fn handle_in_hex_entity_state<S: LexSink + ?Sized>(&mut self, c: u8, sink: &mut S) {
        if c == b';' {
            self.decode_numeric_entity(16, true, sink);
            self.switch_to(self.base_state);
        } else if !c.is_ascii_hexdigit() {
            if !self.xml_mode {
                self.decode_numeric_entity(16, false, sink);
            }
            self.reconsume_in(self.base_state);
        }
    }

    /// Resolve the reference at end of input as if it were terminated by
    /// a non-name byte.
    pub(super) fn flush_entity<S: LexSink + ?Sized>(&mut self, sink: &mut S) {
        match self.state {
            LexerState::InNamedEntity => self.resolve_named_entity(None, sink),
            LexerState::InNumericEntity if !self.xml_mode => {
                self.decode_numeric_entity(10, false, sink);
            }
            LexerState::InHexEntity if !self.xml_mode => {
                self.decode_numeric_entity(16, false, sink);
            }
            _ => {}
        }
    }

    /// Resolve `&name` ending at the current byte. `terminator` is the
    /// byte that ended the name, `None` at end of input.
    fn resolve_named_entity<S: LexSink + ?Sized>(&mut self, terminator: Option<u8>, sink: &mut S) {
        let Some(start) = self.section_start else {
            return;
        };
        let name_start = start + 1;
        if name_start >= self.index {
            return;
        }
        let name = self.buffer.get(name_start..self.index).unwrap_or_default();
        let in_attribute = self.base_state != LexerState::Text;

        let resolved = if terminator == Some(b';') {
            let key = format!("{name};");
            let full = if self.xml_mode {
                lookup_xml_entity(&key)
            } else {
                lookup_entity(&key)
            };
            full.map(|value| (self.index + 1, value))
        } else {
            None
        };

        // Legacy references without `;` exist only in HTML. In attribute
        // values they must span the whole name and not precede `=`, so
        // query strings like `?a=1&copy=2` survive.
        let resolved = resolved.or_else(|| {
            if self.xml_mode {
                return None;
            }
            let (len, value) = longest_legacy_prefix(name)?;
            if in_attribute && (len != name.len() || terminator == Some(b'=')) {
                return None;
            }
            Some((name_start + len, value))
        });

        if let Some((end, value)) = resolved {
            self.emit_partial(value, end, sink);
        }
    }

    /// Decode `&#digits` or `&#xdigits` ending at the current byte.
    fn decode_numeric_entity<S: LexSink + ?Sized>(
        &mut self,
        radix: u32,
        terminated: bool,
        sink: &mut S,
    ) {
        let Some(start) = self.section_start else {
            return;
        };
        let digits_start = start + if radix == 16 { 3 } else { 2 };
        if digits_start >= self.index {
            return;
        }
        let digits = self.buffer.get(digits_start..self.index).unwrap_or_default();
        // Out of range (including overflow) decodes to U+FFFD.
        let code_point = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
        let decoded = decode_code_point(code_point);
        let end = if terminated { self.index + 1 } else { self.index };
        let mut utf8 = [0; 4];
        self.emit_partial(decoded.encode_utf8(&mut utf8), end, sink);
    }
}
