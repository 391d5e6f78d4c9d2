//! Integration tests for the tree-building handler.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rill_dom::level1::{COMMENT_NODE, ELEMENT_NODE};
use rill_dom::{DomTree, NodeId, NodeType};
use rill_html::{
    DomHandler, DomHandlerOptions, Handler, ParseError, Parser, ParserOptions, Span,
    format_tree, parse_document,
};

/// Helper to parse HTML with default options and return the tree
fn parse(html: &str) -> DomTree {
    parse_document(html, &ParserOptions::new(), DomHandlerOptions::new())
        .expect("parse should succeed")
}

fn parse_with(html: &str, options: &ParserOptions, dom: DomHandlerOptions) -> DomTree {
    parse_document(html, options, dom).expect("parse should succeed")
}

/// Helper to get the tag names of a node list
fn tag_names(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| match &tree.get(id).expect("node").node_type {
            NodeType::Element(data) => data.tag_name.clone(),
            NodeType::Text(data) => format!("#text:{data}"),
            NodeType::Comment(data) => format!("#comment:{data}"),
            NodeType::Cdata => "#cdata".to_string(),
            NodeType::Directive(data) => data.name.clone(),
        })
        .collect()
}

#[test]
fn test_nested_structure() {
    let tree = parse("<div><p>hi</p><span>there</span></div>");
    assert_eq!(tag_names(&tree, tree.roots()), ["div"]);
    let div = tree.roots()[0];
    assert_eq!(tag_names(&tree, tree.children(div)), ["p", "span"]);
    assert_eq!(tree.text_content(div), "hithere");
}

#[test]
fn test_list_items_are_siblings() {
    let tree = parse("<ul><li>a<li>b</ul>");
    let ul = tree.find_element("ul").expect("ul");
    assert_eq!(tag_names(&tree, tree.children(ul)), ["li", "li"]);
    for &li in tree.children(ul) {
        assert_eq!(tree.children(li).len(), 1);
    }
}

#[test]
fn test_void_element_has_no_children() {
    let tree = parse("<br>x");
    assert_eq!(tag_names(&tree, tree.roots()), ["br", "#text:x"]);
    assert!(tree.children(tree.roots()[0]).is_empty());
}

#[test]
fn test_unmatched_close_leaves_tree_alone() {
    let tree = parse("<div>a</span>b</div>");
    let div = tree.roots()[0];
    assert_eq!(tag_names(&tree, tree.children(div)), ["#text:ab"]);
}

#[test]
fn test_adjacent_text_is_merged() {
    let options = ParserOptions::new().with_decode_entities(true);
    let tree = parse_with("a &amp; b &lt;c&gt;", &options, DomHandlerOptions::new());
    assert_eq!(tag_names(&tree, tree.roots()), ["#text:a & b <c>"]);
}

#[test]
fn test_text_is_not_merged_across_other_nodes() {
    let tree = parse("a<!--c-->b<br>c");
    assert_eq!(
        tag_names(&tree, tree.roots()),
        ["#text:a", "#comment:c", "#text:b", "br", "#text:c"]
    );
}

#[test]
fn test_whitespace_normalization() {
    let input = "<p>a \n\t b</p>";
    let raw = parse(input);
    assert_eq!(raw.text_content(raw.roots()[0]), "a \n\t b");

    let normalized = parse_with(
        input,
        &ParserOptions::new(),
        DomHandlerOptions::new().with_normalize_whitespace(true),
    );
    assert_eq!(normalized.text_content(normalized.roots()[0]), "a b");
}

#[test]
fn test_normalization_applies_across_merged_pieces() {
    let tree = parse_with(
        "a &amp;  \n b",
        &ParserOptions::new().with_decode_entities(true),
        DomHandlerOptions::new().with_normalize_whitespace(true),
    );
    assert_eq!(tag_names(&tree, tree.roots()), ["#text:a & b"]);
}

#[test]
fn test_normalization_of_many_small_pieces_is_linear() {
    let input = "a &amp;  ".repeat(20_000);
    let started = Instant::now();
    let tree = parse_with(
        &input,
        &ParserOptions::new().with_decode_entities(true),
        DomHandlerOptions::new().with_normalize_whitespace(true),
    );
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(tree.roots().len(), 1);
    let text = tree.as_text(tree.roots()[0]).expect("text");
    assert_eq!(text, "a & ".repeat(20_000));
}

#[test]
fn test_cdata_becomes_comment_in_html() {
    let tree = parse("<![CDATA[x]]>");
    assert_eq!(tag_names(&tree, tree.roots()), ["#comment:[CDATA[x]]"]);
}

#[test]
fn test_cdata_node_in_xml() {
    let options = ParserOptions::new().with_xml_mode(true);
    let tree = parse_with("<r><![CDATA[a<b]]></r>", &options, DomHandlerOptions::new());
    let r = tree.roots()[0];
    let cdata = tree.children(r)[0];
    assert_eq!(tag_names(&tree, &[cdata]), ["#cdata"]);
    assert_eq!(tag_names(&tree, tree.children(cdata)), ["#text:a<b"]);
}

#[test]
fn test_directive_node() {
    let tree = parse("<!DOCTYPE html><html></html>");
    let doctype = tree.roots()[0];
    match &tree.get(doctype).expect("node").node_type {
        NodeType::Directive(data) => {
            assert_eq!(data.name, "!doctype");
            assert_eq!(data.data, "!DOCTYPE html");
        }
        other => panic!("Expected directive, got {other:?}"),
    }
    let node = tree.node_ref(doctype).expect("node");
    assert_eq!(node.node_type(), ELEMENT_NODE);
    assert_eq!(node.node_value(), Some("!DOCTYPE html"));
}

#[test]
fn test_comment_level1_view() {
    let tree = parse("<!-- hi -->");
    let node = tree.node_ref(tree.roots()[0]).expect("node");
    assert_eq!(node.node_type(), COMMENT_NODE);
    assert_eq!(node.node_value(), Some(" hi "));
}

#[test]
fn test_first_attribute_value_wins() {
    let tree = parse("<a href=one HREF=two title=t>");
    let a = tree.as_element(tree.roots()[0]).expect("element");
    assert_eq!(a.attr("href"), Some("one"));
    assert_eq!(a.attr("title"), Some("t"));
    assert_eq!(a.attrs.len(), 2);
}

#[test]
fn test_indices() {
    let tree = parse_with(
        "<div>hi</div>",
        &ParserOptions::new(),
        DomHandlerOptions::new().with_indices(true),
    );
    let div = tree.get(tree.roots()[0]).expect("div");
    assert_eq!((div.start_index, div.end_index), (Some(0), Some(12)));
    let text = tree.get(div.children[0]).expect("text");
    assert_eq!((text.start_index, text.end_index), (Some(5), Some(6)));
}

#[test]
fn test_end_indices_are_inclusive() {
    let tree = parse_with(
        "<p>ab</p><!--c-->",
        &ParserOptions::new(),
        DomHandlerOptions::new().with_indices(true),
    );
    let p = tree.get(tree.roots()[0]).expect("p");
    assert_eq!((p.start_index, p.end_index), (Some(0), Some(8)));
    let text = tree.get(p.children[0]).expect("text");
    assert_eq!((text.start_index, text.end_index), (Some(3), Some(4)));
    let comment = tree.get(tree.roots()[1]).expect("comment");
    assert_eq!((comment.start_index, comment.end_index), (Some(9), Some(16)));
    assert_eq!(
        format_tree(&tree),
        "<p> [0..=8]\n  \"ab\" [3..=4]\n<!-- c --> [9..=16]\n"
    );
}

#[test]
fn test_indices_for_implied_and_final_closes() {
    let tree = parse_with(
        "<li>a<li>b",
        &ParserOptions::new(),
        DomHandlerOptions::new().with_end_indices(true),
    );
    let first = tree.get(tree.roots()[0]).expect("li");
    let second = tree.get(tree.roots()[1]).expect("li");
    assert_eq!(first.start_index, None);
    assert_eq!(first.end_index, Some(4));
    assert_eq!(second.end_index, Some(9));
}

#[test]
fn test_no_indices_by_default() {
    let tree = parse("<div>hi</div>");
    let div = tree.get(tree.roots()[0]).expect("div");
    assert_eq!((div.start_index, div.end_index), (None, None));
}

#[test]
fn test_element_callback_fires_once_per_element() {
    let closed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&closed);
    let handler = DomHandler::new(DomHandlerOptions::new()).with_element_callback(
        move |tree: &DomTree, id: NodeId| {
            let name = tree.as_element(id).map(|e| e.tag_name.clone());
            sink.borrow_mut().push(name.unwrap_or_default());
        },
    );
    let mut parser = Parser::new(handler, ParserOptions::new());
    parser.end_with("<a><b></b><br></a><c>");
    assert_eq!(*closed.borrow(), ["b", "br", "a", "c"]);
}

#[test]
fn test_completion_callback_runs_once() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let handler = DomHandler::new(DomHandlerOptions::new()).with_callback(move |result| {
        sink.borrow_mut()
            .push(result.map(|tree| tree.roots().len()).map_err(Clone::clone));
    });
    let mut parser = Parser::new(handler, ParserOptions::new());
    parser.write("<a></a>");
    parser.end_with("<b></b>");
    parser.end();
    assert_eq!(*calls.borrow(), [Ok::<usize, ParseError>(2)]);
}

#[test]
fn test_write_after_end_reaches_callback_and_result() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let handler = DomHandler::new(DomHandlerOptions::new()).with_callback(move |result| {
        sink.borrow_mut().push(result.is_ok());
    });
    let mut parser = Parser::new(handler, ParserOptions::new());
    parser.end_with("<a>");
    parser.write("<b>");
    assert_eq!(*calls.borrow(), [true, false]);
    assert_eq!(
        parser.into_handler().into_result(),
        Err(ParseError::WriteAfterEnd)
    );
}

#[test]
fn test_reset_delivers_each_document() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let handler = DomHandler::new(DomHandlerOptions::new()).with_callback(move |result| {
        if let Ok(tree) = result {
            sink.borrow_mut().push(format_tree(tree));
        }
    });
    let mut parser = Parser::new(handler, ParserOptions::new());
    parser.parse_complete("<a>");
    parser.parse_complete("<b>");
    assert_eq!(*calls.borrow(), ["<a>\n", "<b>\n"]);
    assert_eq!(parser.handler().tree().len(), 1);
}

#[test]
fn test_unbalanced_close_is_reported() {
    let mut handler = DomHandler::default();
    handler.on_close_tag("div", Span::at(0));
    handler.on_end();
    assert!(handler.is_done());
    assert_eq!(
        handler.into_result(),
        Err(ParseError::UnbalancedClose {
            name: "div".to_string()
        })
    );
}

#[test]
fn test_mismatched_close_is_reported() {
    let mut handler = DomHandler::default();
    handler.on_open_tag("a", Default::default(), Span::new(0, 3));
    handler.on_close_tag("b", Span::new(3, 7));
    assert_eq!(
        handler.error(),
        Some(&ParseError::TagMismatch {
            expected: "a".to_string(),
            found: "b".to_string()
        })
    );
    // The build carries on regardless.
    assert_eq!(handler.into_tree().len(), 1);
}

#[test]
fn test_format_tree() {
    let tree = parse_with(
        "<p class=x id=y>a b<!--c--></p>",
        &ParserOptions::new(),
        DomHandlerOptions::new().with_start_indices(true),
    );
    assert_eq!(
        format_tree(&tree),
        "<p class=\"x\" id=\"y\"> [0..]\n  \"a\u{b7}b\" [16..]\n  <!-- c --> [19..]\n"
    );
}

#[test]
fn test_garbage_never_fails() {
    for input in ["<", "</", "<!", "<!-", "<?", "&", "<a b='", "]]>", "<<>>", "</>"] {
        let options = ParserOptions::new().with_decode_entities(true);
        assert!(parse_document(input, &options, DomHandlerOptions::new()).is_ok());
    }
}
