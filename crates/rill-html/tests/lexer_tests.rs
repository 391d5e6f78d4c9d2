//! Integration tests for the lexer.

use rill_html::{LexEvent, Lexer, ParseError, ParserOptions, Span};

/// Helper to lex a complete input and return the events
fn lex_with(input: &str, options: &ParserOptions) -> Vec<LexEvent> {
    let mut lexer = Lexer::new(options);
    let mut events = Vec::new();
    lexer.write(input, &mut events);
    lexer.end(&mut events);
    events
}

fn lex(input: &str) -> Vec<LexEvent> {
    lex_with(input, &ParserOptions::new())
}

fn lex_decoded(input: &str) -> Vec<LexEvent> {
    lex_with(input, &ParserOptions::new().with_decode_entities(true))
}

/// Helper to concatenate all text events
fn text_of(events: &[LexEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            LexEvent::Text { data, .. } => Some(data.as_str()),
            _ => None,
        })
        .collect()
}

fn text(data: &str, start: usize, end: usize) -> LexEvent {
    LexEvent::Text {
        data: data.to_string(),
        span: Span::new(start, end),
    }
}

#[test]
fn test_element_with_attribute() {
    let events = lex("<div class=\"a\">hi</div>");
    assert_eq!(
        events,
        vec![
            LexEvent::OpenTagName {
                name: "div".to_string(),
                start: 0
            },
            LexEvent::AttributeName {
                name: "class".to_string()
            },
            LexEvent::AttributeData {
                value: "a".to_string()
            },
            LexEvent::AttributeEnd,
            LexEvent::OpenTagEnd {
                self_closing: false,
                end: 15
            },
            text("hi", 15, 17),
            LexEvent::CloseTag {
                name: "div".to_string(),
                span: Span::new(17, 23)
            },
            LexEvent::End { offset: 23 },
        ]
    );
}

#[test]
fn test_valueless_and_unquoted_attributes() {
    let events = lex("<input disabled value=x>");
    assert_eq!(
        events,
        vec![
            LexEvent::OpenTagName {
                name: "input".to_string(),
                start: 0
            },
            LexEvent::AttributeName {
                name: "disabled".to_string()
            },
            LexEvent::AttributeEnd,
            LexEvent::AttributeName {
                name: "value".to_string()
            },
            LexEvent::AttributeData {
                value: "x".to_string()
            },
            LexEvent::AttributeEnd,
            LexEvent::OpenTagEnd {
                self_closing: false,
                end: 24
            },
            LexEvent::End { offset: 24 },
        ]
    );
}

#[test]
fn test_self_closing_flag() {
    let events = lex("<br/>");
    assert_eq!(
        events[1],
        LexEvent::OpenTagEnd {
            self_closing: true,
            end: 5
        }
    );
}

#[test]
fn test_names_are_reported_as_written() {
    let events = lex("<DiV></dIv>");
    assert!(matches!(&events[0], LexEvent::OpenTagName { name, .. } if name == "DiV"));
    assert!(matches!(&events[2], LexEvent::CloseTag { name, .. } if name == "dIv"));
}

#[test]
fn test_comment() {
    let events = lex("<!-- x -->");
    assert_eq!(
        events,
        vec![
            LexEvent::Comment {
                data: " x ".to_string(),
                span: Span::new(0, 10)
            },
            LexEvent::End { offset: 10 },
        ]
    );
}

#[test]
fn test_comment_edge_cases() {
    let empty = lex("<!---->");
    assert!(matches!(&empty[0], LexEvent::Comment { data, .. } if data.is_empty()));

    let dashes = lex("<!-- a - b --->");
    assert!(matches!(&dashes[0], LexEvent::Comment { data, .. } if data == " a - b -"));
}

#[test]
fn test_cdata() {
    let events = lex("<![CDATA[a<b]]>");
    assert_eq!(
        events[0],
        LexEvent::Cdata {
            data: "a<b".to_string(),
            span: Span::new(0, 15)
        }
    );
}

#[test]
fn test_declaration_and_processing_instruction() {
    let events = lex("<!DOCTYPE html><?xml version=\"1.0\"?>");
    assert_eq!(
        events[0],
        LexEvent::Declaration {
            data: "DOCTYPE html".to_string(),
            span: Span::new(0, 15)
        }
    );
    assert_eq!(
        events[1],
        LexEvent::ProcessingInstruction {
            data: "xml version=\"1.0\"?".to_string(),
            span: Span::new(15, 36)
        }
    );
}

#[test]
fn test_script_content_is_raw_text() {
    let events = lex("<script>if (a<b) x=\"</div>\";</script>");
    assert_eq!(text_of(&events), "if (a<b) x=\"</div>\";");
    assert!(
        events
            .iter()
            .all(|event| !matches!(event, LexEvent::OpenTagName { name, .. } if name == "b"))
    );
    assert_eq!(
        events[events.len() - 2],
        LexEvent::CloseTag {
            name: "script".to_string(),
            span: Span::new(28, 37)
        }
    );
}

#[test]
fn test_style_content_is_raw_text() {
    let events = lex("<STYLE>a > b { }</Style>p");
    assert_eq!(text_of(&events), "a > b { }p");
    assert!(events.iter().any(|event| matches!(event, LexEvent::CloseTag { name, .. } if name == "Style")));
}

#[test]
fn test_raw_text_is_not_entity_decoded() {
    let events = lex_decoded("<script>a &amp; b</script>");
    assert_eq!(text_of(&events), "a &amp; b");
}

#[test]
fn test_script_prefix_is_not_raw_text() {
    let events = lex("<scripts><b>x</b></scripts>");
    assert!(events.iter().any(|event| matches!(event, LexEvent::OpenTagName { name, .. } if name == "b")));
}

#[test]
fn test_entities_not_decoded_by_default() {
    let events = lex("a &amp; b");
    assert_eq!(events[0], text("a &amp; b", 0, 9));
}

#[test]
fn test_named_entity_splits_text() {
    let events = lex_decoded("a &amp; b");
    assert_eq!(
        events,
        vec![
            text("a ", 0, 2),
            text("&", 2, 7),
            text(" b", 7, 9),
            LexEvent::End { offset: 9 },
        ]
    );
}

#[test]
fn test_numeric_entities() {
    assert_eq!(text_of(&lex_decoded("&#x41;&#66;")), "AB");
    assert_eq!(text_of(&lex_decoded("&#X263a;")), "\u{263A}");
    assert_eq!(text_of(&lex_decoded("&#150;")), "\u{2013}");
    assert_eq!(text_of(&lex_decoded("&#0;")), "\u{FFFD}");
    assert_eq!(text_of(&lex_decoded("&#xD800;")), "\u{FFFD}");
    assert_eq!(text_of(&lex_decoded("&#99999999999;")), "\u{FFFD}");
}

#[test]
fn test_numeric_entity_without_semicolon() {
    assert_eq!(text_of(&lex_decoded("&#65 x")), "A x");
    // No digits: left alone.
    assert_eq!(text_of(&lex_decoded("&#;")), "&#;");
}

#[test]
fn test_legacy_entities() {
    assert_eq!(text_of(&lex_decoded("&amp x")), "& x");
    assert_eq!(text_of(&lex_decoded("&notit;")), "\u{00AC}it;");
    assert_eq!(text_of(&lex_decoded("&copy")), "\u{00A9}");
    // Not a legacy name: needs the semicolon.
    assert_eq!(text_of(&lex_decoded("&hellip x")), "&hellip x");
}

#[test]
fn test_full_names_win_over_legacy_prefixes() {
    assert_eq!(
        text_of(&lex_decoded("a&notin;b &hearts; &Eacute; &apos")),
        "a\u{2209}b \u{2665} \u{00C9} &apos"
    );
    assert_eq!(text_of(&lex_decoded("&NotNestedGreaterGreater;")), "\u{2AA2}\u{0338}");
}

#[test]
fn test_unknown_entity_is_literal() {
    assert_eq!(text_of(&lex_decoded("&bogus; & &;")), "&bogus; & &;");
}

#[test]
fn test_entities_in_attribute_values() {
    let events = lex_decoded("<a title=\"&copy 2024\" href=\"?a=1&copy=2&amp;b\">");
    let values: Vec<&str> = events
        .iter()
        .filter_map(|event| match event {
            LexEvent::AttributeData { value } => Some(value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(values.concat(), "\u{00A9} 2024?a=1&copy=2&b");
}

#[test]
fn test_xml_mode_entities() {
    let options = ParserOptions::new()
        .with_xml_mode(true)
        .with_decode_entities(true);
    assert_eq!(text_of(&lex_with("&apos;&amp;", &options)), "'&");
    assert_eq!(text_of(&lex_with("&nbsp;", &options)), "&nbsp;");
    assert_eq!(text_of(&lex_with("&amp x", &options)), "&amp x");
}

#[test]
fn test_xml_mode_has_no_raw_text() {
    let options = ParserOptions::new().with_xml_mode(true);
    let events = lex_with("<script><b/></script>", &options);
    assert!(events.iter().any(|event| matches!(event, LexEvent::OpenTagName { name, .. } if name == "b")));
}

#[test]
fn test_stray_less_than_is_text() {
    assert_eq!(text_of(&lex("a < b")), "a < b");
    assert_eq!(text_of(&lex("a<<b>")), "a<");
    assert_eq!(text_of(&lex("1 <> 2")), "1 <> 2");
}

#[test]
fn test_trailing_text_is_flushed() {
    assert_eq!(
        lex("a <"),
        vec![text("a ", 0, 2), text("<", 2, 3), LexEvent::End { offset: 3 }]
    );
    assert_eq!(
        lex("<!DOCTYPE"),
        vec![text("<!DOCTYPE", 0, 9), LexEvent::End { offset: 9 }]
    );
}

#[test]
fn test_trailing_partial_tag_is_dropped() {
    assert_eq!(lex("text<div"), vec![text("text", 0, 4), LexEvent::End { offset: 8 }]);

    let events = lex("<div class=\"x");
    assert!(!events.iter().any(|event| matches!(event, LexEvent::OpenTagEnd { .. })));
    assert!(!events.iter().any(|event| matches!(event, LexEvent::Text { .. })));
    assert_eq!(events.last(), Some(&LexEvent::End { offset: 13 }));

    let events = lex("x</div");
    assert_eq!(events, vec![text("x", 0, 1), LexEvent::End { offset: 6 }]);
}

#[test]
fn test_trailing_comment_and_cdata_are_flushed() {
    assert_eq!(
        lex("<!-- open")[0],
        LexEvent::Comment {
            data: " open".to_string(),
            span: Span::new(0, 9)
        }
    );
    assert_eq!(
        lex("<![CDATA[x]")[0],
        LexEvent::Cdata {
            data: "x]".to_string(),
            span: Span::new(0, 11)
        }
    );
}

#[test]
fn test_trailing_entity_is_resolved() {
    assert_eq!(text_of(&lex_decoded("a&amp")), "a&");
    assert_eq!(text_of(&lex_decoded("&#x42")), "B");
}

#[test]
fn test_every_split_point_gives_same_events() {
    let input = "<p class='x' id=y>a &amp; b<!-- c --><script>1<2</script><![CDATA[z]]>&#65;</p>";
    let options = ParserOptions::new().with_decode_entities(true);
    let whole = lex_with(input, &options);

    for split in 1..input.len() {
        let mut lexer = Lexer::new(&options);
        let mut events = Vec::new();
        lexer.write(&input[..split], &mut events);
        lexer.write(&input[split..], &mut events);
        lexer.end(&mut events);
        assert_eq!(events, whole, "split at {split}");
    }
}

#[test]
fn test_byte_at_a_time() {
    let input = "<ul><li>caf\u{e9} &eacute;<li>\u{1F600}</ul>";
    let options = ParserOptions::new().with_decode_entities(true);
    let whole = lex_with(input, &options);

    let mut lexer = Lexer::new(&options);
    let mut events = Vec::new();
    for c in input.chars() {
        lexer.write(c.encode_utf8(&mut [0; 4]), &mut events);
    }
    lexer.end(&mut events);
    assert_eq!(events, whole);
}

#[test]
fn test_offsets_continue_across_chunks() {
    let mut lexer = Lexer::new(&ParserOptions::new());
    let mut events = Vec::new();
    lexer.write("<a>", &mut events);
    lexer.write("</a><b>", &mut events);
    assert_eq!(lexer.position(), 10);
    assert_eq!(
        events[2],
        LexEvent::CloseTag {
            name: "a".to_string(),
            span: Span::new(3, 7)
        }
    );
}

#[test]
fn test_write_after_end_is_an_error() {
    let mut lexer = Lexer::new(&ParserOptions::new());
    let mut events = Vec::new();
    lexer.end(&mut events);
    lexer.write("x", &mut events);
    assert_eq!(
        events,
        vec![
            LexEvent::End { offset: 0 },
            LexEvent::Error(ParseError::WriteAfterEnd)
        ]
    );
}

#[test]
fn test_end_is_idempotent() {
    let mut lexer = Lexer::new(&ParserOptions::new());
    let mut events = Vec::new();
    lexer.write("x", &mut events);
    lexer.end(&mut events);
    lexer.end(&mut events);
    assert_eq!(events, vec![text("x", 0, 1), LexEvent::End { offset: 1 }]);
    assert!(lexer.is_ended());
}

#[test]
fn test_pause_buffers_until_resume() {
    let mut lexer = Lexer::new(&ParserOptions::new());
    let mut events = Vec::new();
    lexer.pause();
    assert!(lexer.is_paused());
    lexer.write("<b>x</b>", &mut events);
    lexer.end(&mut events);
    assert!(events.is_empty());

    lexer.resume(&mut events);
    assert!(!lexer.is_paused());
    assert_eq!(events.len(), 5);
    assert_eq!(events.last(), Some(&LexEvent::End { offset: 8 }));
}

#[test]
fn test_reset_restarts_offsets() {
    let mut lexer = Lexer::new(&ParserOptions::new());
    let mut events = Vec::new();
    lexer.write("<a>text", &mut events);
    lexer.reset();
    events.clear();
    lexer.write("<b>", &mut events);
    lexer.end(&mut events);
    assert_eq!(
        events[0],
        LexEvent::OpenTagName {
            name: "b".to_string(),
            start: 0
        }
    );
}

#[test]
fn test_event_display() {
    assert_eq!(text("hi", 0, 2).to_string(), "Text(\"hi\") @ 0..2");
    assert_eq!(LexEvent::AttributeEnd.to_string(), "AttributeEnd");
    assert_eq!(
        LexEvent::Error(ParseError::WriteAfterEnd).to_string(),
        "Error(write() called after end())"
    );
}
