use std::mem;

use log::debug;
use rill_dom::AttributesMap;

use super::tables::{implied_closes, is_void_element};
use crate::handler::Handler;
use crate::lexer::{LexEvent, LexSink, Span};
use crate::options::ParserOptions;

/// Turns lexical events into balanced structural events.
///
/// Keeps the stack of open element names, applies implied closes and void
/// elements, assembles attributes, and forwards the result to a
/// [`Handler`].
#[derive(Debug)]
pub(super) struct Structure<H> {
    pub(super) options: ParserOptions,
    lower_case_tags: bool,
    lower_case_attribute_names: bool,
    /// Names of open elements, innermost last.
    pub(super) stack: Vec<String>,
    tag_name: String,
    tag_start: usize,
    attribute_name: String,
    attribute_value: String,
    attributes: AttributesMap,
    pub(super) handler: H,
}

impl<H: Handler> Structure<H> {
    pub(super) fn new(handler: H, options: ParserOptions) -> Self {
        Self {
            lower_case_tags: options.lowercases_tags(),
            lower_case_attribute_names: options.lowercases_attribute_names(),
            options,
            stack: Vec::new(),
            tag_name: String::new(),
            tag_start: 0,
            attribute_name: String::new(),
            attribute_value: String::new(),
            attributes: AttributesMap::new(),
            handler,
        }
    }

    pub(super) fn reset(&mut self) {
        self.stack.clear();
        self.tag_name.clear();
        self.tag_start = 0;
        self.attribute_name.clear();
        self.attribute_value.clear();
        self.attributes.clear();
        self.handler.on_reset();
    }

    fn fold_tag_name(&self, name: String) -> String {
        if self.lower_case_tags {
            name.to_lowercase()
        } else {
            name
        }
    }

    fn open_tag_name(&mut self, name: String, start: usize) {
        let name = self.fold_tag_name(name);
        self.tag_start = start;

        if !self.options.xml_mode {
            let closes = implied_closes(&name);
            while self
                .stack
                .last()
                .is_some_and(|open| closes.contains(&open.as_str()))
            {
                if let Some(open) = self.stack.pop() {
                    debug!("<{name}> at {start} implicitly closes <{open}>");
                    self.handler.on_close_tag(&open, Span::at(start));
                }
            }
        }

        self.handler.on_open_tag_name(&name);
        self.tag_name = name;
        self.attributes.clear();
    }

    fn attribute_end(&mut self) {
        let name = mem::take(&mut self.attribute_name);
        let value = mem::take(&mut self.attribute_value);
        self.handler.on_attribute(&name, &value);
        // First occurrence wins.
        let _ = self.attributes.entry(name).or_insert(value);
    }

    fn open_tag_end(&mut self, span: Span) {
        let name = mem::take(&mut self.tag_name);
        let attributes = mem::take(&mut self.attributes);
        let is_void = !self.options.xml_mode && is_void_element(&name);

        self.handler.on_open_tag(&name, attributes, span);
        if is_void {
            self.handler.on_close_tag(&name, span);
        } else {
            self.stack.push(name);
        }
    }

    /// Open the current tag and close it again right away, as for `<x/>`.
    fn close_current_tag(&mut self, span: Span) {
        let name = self.tag_name.clone();
        self.open_tag_end(span);
        if self.stack.last().is_some_and(|open| *open == name)
            && let Some(open) = self.stack.pop()
        {
            self.handler.on_close_tag(&open, span);
        }
    }

    fn close_tag(&mut self, name: String, span: Span) {
        let name = self.fold_tag_name(name);
        let xml_mode = self.options.xml_mode;

        if !self.stack.is_empty() && (xml_mode || !is_void_element(&name)) {
            if let Some(position) = self.stack.iter().rposition(|open| *open == name) {
                while self.stack.len() > position {
                    if let Some(open) = self.stack.pop() {
                        if open != name {
                            debug!("</{name}> at {} implicitly closes <{open}>", span.start);
                        }
                        self.handler.on_close_tag(&open, span);
                    }
                }
                return;
            }
            if name == "p" && !xml_mode {
                self.synthesize_empty_element(name, span);
                return;
            }
        } else if !xml_mode && (name == "br" || name == "p") {
            self.synthesize_empty_element(name, span);
            return;
        }
        debug!("ignoring unmatched </{name}> at {}", span.start);
    }

    /// A stray `</p>` or `</br>` stands for an empty element.
    fn synthesize_empty_element(&mut self, name: String, span: Span) {
        self.open_tag_name(name, span.start);
        self.close_current_tag(span);
    }

    fn cdata(&mut self, data: &str, span: Span) {
        if self.options.cdata_enabled() {
            self.handler.on_cdata_start(span);
            self.handler.on_text(data, span);
            self.handler.on_cdata_end(span);
        } else {
            let data = format!("[CDATA[{data}]]");
            self.handler.on_comment(&data, span);
            self.handler.on_comment_end(span);
        }
    }

    fn instruction(&mut self, marker: char, data: &str, span: Span) {
        let name = data
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();
        let name = if self.lower_case_tags {
            name.to_lowercase()
        } else {
            name.to_string()
        };
        self.handler
            .on_processing_instruction(&format!("{marker}{name}"), &format!("{marker}{data}"), span);
    }

    fn end(&mut self, offset: usize) {
        while let Some(open) = self.stack.pop() {
            self.handler.on_close_tag(&open, Span::at(offset));
        }
        self.handler.on_end();
    }
}

impl<H: Handler> LexSink for Structure<H> {
    fn lex(&mut self, event: LexEvent) {
        match event {
            LexEvent::Text { data, span } => self.handler.on_text(&data, span),
            LexEvent::OpenTagName { name, start } => self.open_tag_name(name, start),
            LexEvent::AttributeName { name } => {
                self.attribute_name = if self.lower_case_attribute_names {
                    name.to_lowercase()
                } else {
                    name
                };
            }
            LexEvent::AttributeData { value } => self.attribute_value.push_str(&value),
            LexEvent::AttributeEnd => self.attribute_end(),
            LexEvent::OpenTagEnd { self_closing, end } => {
                let span = Span::new(self.tag_start, end);
                if self_closing && self.options.self_closing_enabled() {
                    self.close_current_tag(span);
                } else {
                    self.open_tag_end(span);
                }
            }
            LexEvent::CloseTag { name, span } => self.close_tag(name, span),
            LexEvent::Comment { data, span } => {
                self.handler.on_comment(&data, span);
                self.handler.on_comment_end(span);
            }
            LexEvent::Cdata { data, span } => self.cdata(&data, span),
            LexEvent::Declaration { data, span } => self.instruction('!', &data, span),
            LexEvent::ProcessingInstruction { data, span } => self.instruction('?', &data, span),
            LexEvent::End { offset } => self.end(offset),
            LexEvent::Error(error) => self.handler.on_error(error),
        }
    }

    fn should_pause(&mut self) -> bool {
        self.handler.should_pause()
    }
}
