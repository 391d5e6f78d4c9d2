//! Integration tests for the structural parser.

use std::mem;

use rill_dom::AttributesMap;
use rill_html::{Handler, ParseError, Parser, ParserOptions, Span};

/// Records structural events as compact strings.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
}

impl Handler for Recorder {
    fn on_reset(&mut self) {
        self.events.push("reset".to_string());
    }

    fn on_attribute(&mut self, name: &str, value: &str) {
        self.events.push(format!("attr:{name}={value}"));
    }

    fn on_open_tag(&mut self, name: &str, _attrs: AttributesMap, _span: Span) {
        self.events.push(format!("open:{name}"));
    }

    fn on_close_tag(&mut self, name: &str, _span: Span) {
        self.events.push(format!("close:{name}"));
    }

    fn on_text(&mut self, text: &str, _span: Span) {
        self.events.push(format!("text:{text}"));
    }

    fn on_comment(&mut self, data: &str, _span: Span) {
        self.events.push(format!("comment:{data}"));
    }

    fn on_comment_end(&mut self, _span: Span) {
        self.events.push("commentend".to_string());
    }

    fn on_cdata_start(&mut self, _span: Span) {
        self.events.push("cdatastart".to_string());
    }

    fn on_cdata_end(&mut self, _span: Span) {
        self.events.push("cdataend".to_string());
    }

    fn on_processing_instruction(&mut self, name: &str, data: &str, _span: Span) {
        self.events.push(format!("pi:{name}:{data}"));
    }

    fn on_error(&mut self, error: ParseError) {
        self.events.push(format!("error:{error}"));
    }

    fn on_end(&mut self) {
        self.events.push("end".to_string());
    }
}

/// Helper to parse a complete input and return the recorded events
fn events_with(input: &str, options: ParserOptions) -> Vec<String> {
    let mut parser = Parser::new(Recorder::default(), options);
    parser.end_with(input);
    parser.into_handler().events
}

fn events(input: &str) -> Vec<String> {
    events_with(input, ParserOptions::new())
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        events("<ul><li>a<li>b</ul>"),
        [
            "open:ul", "open:li", "text:a", "close:li", "open:li", "text:b", "close:li",
            "close:ul", "end"
        ]
    );
}

#[test]
fn test_paragraph_closed_by_paragraph_and_heading() {
    assert_eq!(
        events("<p>a<p>b<h1>c"),
        [
            "open:p", "text:a", "close:p", "open:p", "text:b", "close:p", "open:h1", "text:c",
            "close:h1", "end"
        ]
    );
    // div is not in the table, so the paragraph stays open around it.
    assert_eq!(
        events("<p>a<div>b</div>"),
        ["open:p", "text:a", "open:div", "text:b", "close:div", "close:p", "end"]
    );
}

#[test]
fn test_table_cells_and_rows() {
    assert_eq!(
        events("<table><tr><td>a<td>b<tr><td>c</table>"),
        [
            "open:table",
            "open:tr",
            "open:td",
            "text:a",
            "close:td",
            "open:td",
            "text:b",
            "close:td",
            "close:tr",
            "open:tr",
            "open:td",
            "text:c",
            "close:td",
            "close:tr",
            "close:table",
            "end"
        ]
    );
}

#[test]
fn test_form_controls() {
    assert_eq!(
        events("<select><option>a<option>b</select>"),
        [
            "open:select",
            "open:option",
            "text:a",
            "close:option",
            "open:option",
            "text:b",
            "close:option",
            "close:select",
            "end"
        ]
    );
}

#[test]
fn test_implied_close_precedes_open_tag_name() {
    #[derive(Default)]
    struct Order(Vec<String>);
    impl Handler for Order {
        fn on_open_tag_name(&mut self, name: &str) {
            self.0.push(format!("name:{name}"));
        }
        fn on_close_tag(&mut self, name: &str, _span: Span) {
            self.0.push(format!("close:{name}"));
        }
    }

    let mut parser = Parser::new(Order::default(), ParserOptions::new());
    parser.end_with("<li><li>");
    assert_eq!(
        parser.handler().0,
        ["name:li", "close:li", "name:li", "close:li"]
    );
}

#[test]
fn test_void_elements_close_immediately() {
    assert_eq!(
        events("<br><img src=x>text"),
        [
            "open:br",
            "close:br",
            "attr:src=x",
            "open:img",
            "close:img",
            "text:text",
            "end"
        ]
    );
}

#[test]
fn test_void_close_tag_is_ignored() {
    assert_eq!(
        events("<div><img></img></div>"),
        ["open:div", "open:img", "close:img", "close:div", "end"]
    );
}

#[test]
fn test_unmatched_close_is_discarded() {
    assert_eq!(
        events("<div></span></div>"),
        ["open:div", "close:div", "end"]
    );
    assert_eq!(events("</span>"), ["end"]);
}

#[test]
fn test_close_pops_intervening_elements() {
    assert_eq!(
        events("<div><span><b>x</div>"),
        [
            "open:div",
            "open:span",
            "open:b",
            "text:x",
            "close:b",
            "close:span",
            "close:div",
            "end"
        ]
    );
}

#[test]
fn test_stray_paragraph_and_break_closes() {
    assert_eq!(events("</p>"), ["open:p", "close:p", "end"]);
    assert_eq!(events("</br>"), ["open:br", "close:br", "end"]);
    assert_eq!(
        events("<div></p></div>"),
        ["open:div", "open:p", "close:p", "close:div", "end"]
    );
}

#[test]
fn test_self_closing_ignored_in_html() {
    assert_eq!(
        events("<div/>x"),
        ["open:div", "text:x", "close:div", "end"]
    );
}

#[test]
fn test_self_closing_recognized_on_request() {
    let options = ParserOptions::new().with_recognize_self_closing(true);
    assert_eq!(
        events_with("<div/>x<br/>", options),
        ["open:div", "close:div", "text:x", "open:br", "close:br", "end"]
    );
}

#[test]
fn test_xml_mode() {
    let options = ParserOptions::new().with_xml_mode(true);
    assert_eq!(
        events_with("<Foo Bar=\"1\"/><br>x</br><li><li>", options),
        [
            "attr:Bar=1",
            "open:Foo",
            "close:Foo",
            "open:br",
            "text:x",
            "close:br",
            "open:li",
            "open:li",
            "close:li",
            "close:li",
            "end"
        ]
    );
}

#[test]
fn test_xml_mode_does_not_synthesize() {
    let options = ParserOptions::new().with_xml_mode(true);
    assert_eq!(events_with("</p></br>", options), ["end"]);
}

#[test]
fn test_names_are_lowercased_in_html() {
    assert_eq!(
        events("<DIV ID=a></div>"),
        ["attr:id=a", "open:div", "close:div", "end"]
    );
}

#[test]
fn test_lowercasing_can_be_disabled() {
    let options = ParserOptions::new()
        .with_lower_case_tags(false)
        .with_lower_case_attribute_names(false);
    assert_eq!(
        events_with("<DIV ID=a></DIV>", options),
        ["attr:ID=a", "open:DIV", "close:DIV", "end"]
    );
}

#[test]
fn test_duplicate_attributes_are_all_reported() {
    assert_eq!(
        events("<a x=1 x=2>"),
        ["attr:x=1", "attr:x=2", "open:a", "close:a", "end"]
    );
}

#[test]
fn test_cdata_as_comment_in_html() {
    assert_eq!(
        events("<![CDATA[x]]>"),
        ["comment:[CDATA[x]]", "commentend", "end"]
    );
}

#[test]
fn test_cdata_recognized() {
    let options = ParserOptions::new().with_recognize_cdata(true);
    assert_eq!(
        events_with("<![CDATA[x]]>", options),
        ["cdatastart", "text:x", "cdataend", "end"]
    );
}

#[test]
fn test_comment_events() {
    assert_eq!(
        events("a<!-- c -->b"),
        ["text:a", "comment: c ", "commentend", "text:b", "end"]
    );
}

#[test]
fn test_declarations_and_processing_instructions() {
    assert_eq!(
        events("<!DOCTYPE html>"),
        ["pi:!doctype:!DOCTYPE html", "end"]
    );
    let options = ParserOptions::new().with_xml_mode(true);
    assert_eq!(
        events_with("<?xml version=\"1.0\"?><!DOCTYPE note>", options),
        [
            "pi:?xml:?xml version=\"1.0\"?",
            "pi:!DOCTYPE:!DOCTYPE note",
            "end"
        ]
    );
}

#[test]
fn test_end_closes_open_elements_innermost_first() {
    assert_eq!(
        events("<a><b>"),
        ["open:a", "open:b", "close:b", "close:a", "end"]
    );
}

#[test]
fn test_unterminated_tag_is_not_opened() {
    assert_eq!(
        events("<div><span"),
        ["open:div", "close:div", "end"]
    );
}

#[test]
fn test_open_elements_tracks_stack() {
    let mut parser = Parser::new(Recorder::default(), ParserOptions::new());
    parser.write("<div><p>");
    assert_eq!(parser.open_elements(), ["div", "p"]);
    parser.write("<br>");
    assert_eq!(parser.open_elements(), ["div", "p"]);
    parser.write("</div>");
    assert!(parser.open_elements().is_empty());
}

#[test]
fn test_write_after_end_reports_error() {
    let mut parser = Parser::new(Recorder::default(), ParserOptions::new());
    parser.end_with("x");
    parser.write("y");
    parser.end();
    assert_eq!(
        parser.handler().events,
        ["text:x", "end", "error:write() called after end()"]
    );
}

#[test]
fn test_pause_and_resume() {
    let mut parser = Parser::new(Recorder::default(), ParserOptions::new());
    parser.pause();
    parser.write("<a>x</a>");
    parser.end();
    assert!(parser.handler().events.is_empty());
    assert!(parser.is_paused());

    parser.resume();
    assert_eq!(
        parser.handler().events,
        ["open:a", "text:x", "close:a", "end"]
    );
}

/// Asks the parser to stop as soon as a given element has been opened.
#[derive(Debug, Default)]
struct PauseOnOpen {
    inner: Recorder,
    pause_on: &'static str,
    pause_requested: bool,
}

impl Handler for PauseOnOpen {
    fn on_open_tag(&mut self, name: &str, attrs: AttributesMap, span: Span) {
        self.pause_requested = name == self.pause_on;
        self.inner.on_open_tag(name, attrs, span);
    }

    fn on_close_tag(&mut self, name: &str, span: Span) {
        self.inner.on_close_tag(name, span);
    }

    fn on_text(&mut self, text: &str, span: Span) {
        self.inner.on_text(text, span);
    }

    fn on_end(&mut self) {
        self.inner.on_end();
    }

    fn should_pause(&mut self) -> bool {
        mem::take(&mut self.pause_requested)
    }
}

#[test]
fn test_handler_pauses_in_the_middle_of_a_chunk() {
    let handler = PauseOnOpen {
        pause_on: "b",
        ..PauseOnOpen::default()
    };
    let mut parser = Parser::new(handler, ParserOptions::new());
    parser.write("<a>1<b>2</b>");
    assert!(parser.is_paused());
    assert_eq!(parser.position(), 7);
    assert_eq!(parser.handler().inner.events, ["open:a", "text:1", "open:b"]);

    parser.write("3</a>");
    parser.end();
    assert_eq!(parser.handler().inner.events.len(), 3);

    parser.resume();
    assert!(!parser.is_paused());
    assert_eq!(
        parser.handler().inner.events,
        [
            "open:a", "text:1", "open:b", "text:2", "close:b", "text:3", "close:a", "end"
        ]
    );
}

#[test]
fn test_reset_starts_a_new_document() {
    let mut parser = Parser::new(Recorder::default(), ParserOptions::new());
    parser.write("<a>");
    parser.reset();
    assert!(parser.open_elements().is_empty());
    parser.end_with("<b>");
    assert_eq!(
        parser.handler().events,
        ["open:a", "reset", "open:b", "close:b", "end"]
    );
}

#[test]
fn test_parse_complete_reuses_parser() {
    let mut parser = Parser::new(Recorder::default(), ParserOptions::new());
    parser.parse_complete("<a>");
    parser.parse_complete("<b>");
    assert_eq!(
        parser.handler().events,
        ["reset", "open:a", "close:a", "end", "reset", "open:b", "close:b", "end"]
    );
}

#[test]
fn test_handler_by_mutable_reference() {
    let mut recorder = Recorder::default();
    {
        let mut parser = Parser::new(&mut recorder, ParserOptions::new());
        parser.end_with("<i>");
    }
    assert_eq!(recorder.events, ["open:i", "close:i", "end"]);
}

#[test]
fn test_option_defaults() {
    let html = ParserOptions::new();
    assert!(html.lowercases_tags());
    assert!(html.lowercases_attribute_names());
    assert!(!html.cdata_enabled());
    assert!(!html.self_closing_enabled());

    let xml = ParserOptions::new().with_xml_mode(true);
    assert!(!xml.lowercases_tags());
    assert!(xml.cdata_enabled());
    assert!(xml.self_closing_enabled());
    assert!(xml.clone().with_lower_case_tags(true).lowercases_tags());
}
