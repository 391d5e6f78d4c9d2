//! Tests for tree construction links and the DOM Level 1 view.

use rill_dom::level1::{CDATA_SECTION_NODE, COMMENT_NODE, ELEMENT_NODE, TEXT_NODE};
use rill_dom::{DirectiveData, DomTree, ElementData, NodeId, NodeKind, NodeType};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(
        tag.to_string(),
        Default::default(),
    )))
}

fn alloc_text(tree: &mut DomTree, data: &str) -> NodeId {
    tree.alloc(NodeType::Text(data.to_string()))
}

// ========== append ==========

#[test]
fn test_append_root_links_siblings() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_root(a);
    tree.append_root(b);

    assert_eq!(tree.roots(), &[a, b]);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_append_child_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_root(parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append(Some(parent), c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    for child in [a, b, c] {
        assert_eq!(tree.parent(child), Some(parent));
    }
}

#[test]
fn test_children_of_none_is_roots() {
    let mut tree = DomTree::new();
    let t = alloc_text(&mut tree, "x");
    tree.append(None, t);
    assert_eq!(tree.children_of(None), &[t]);
    assert!(tree.children_of(Some(t)).is_empty());
}

// ========== traversal ==========

#[test]
fn test_ancestors_and_descendants() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let p = alloc_element(&mut tree, "p");
    tree.append_root(html);
    tree.append_child(html, body);
    tree.append_child(body, p);

    assert_eq!(tree.ancestors(p).collect::<Vec<_>>(), vec![body, html]);
    assert!(tree.is_descendant_of(p, html));
    assert!(!tree.is_descendant_of(html, p));
    assert_eq!(tree.find_element("p"), Some(p));
    assert_eq!(tree.find_element("span"), None);
}

#[test]
fn test_preceding_siblings() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    tree.append_root(parent);
    let items: Vec<NodeId> = (0..3).map(|_| alloc_element(&mut tree, "li")).collect();
    for &item in &items {
        tree.append_child(parent, item);
    }
    assert_eq!(
        tree.preceding_siblings(items[2]).collect::<Vec<_>>(),
        vec![items[1], items[0]]
    );
}

#[test]
fn test_text_content_skips_comments() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_root(p);
    let hello = alloc_text(&mut tree, "Hello ");
    let comment = tree.alloc(NodeType::Comment("ignored".to_string()));
    let b = alloc_element(&mut tree, "b");
    let there = alloc_text(&mut tree, "there");
    tree.append_child(p, hello);
    tree.append_child(p, comment);
    tree.append_child(p, b);
    tree.append_child(b, there);

    assert_eq!(tree.text_content(p), "Hello there");
    assert_eq!(tree.as_comment(comment), Some("ignored"));
}

#[test]
fn test_node_kind_display() {
    assert_eq!(NodeType::Cdata.kind(), NodeKind::Cdata);
    assert_eq!(NodeKind::Directive.to_string(), "directive");
    let kind: &'static str = NodeKind::Element.into();
    assert_eq!(kind, "element");
}

// ========== DOM Level 1 view ==========

#[test]
fn test_level1_accessors() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    tree.append_root(div);
    let text = alloc_text(&mut tree, "hi");
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    let cdata = tree.alloc(NodeType::Cdata);
    tree.append_child(div, text);
    tree.append_child(div, comment);
    tree.append_child(div, cdata);

    let view = tree.node_ref(div).expect("div exists");
    assert_eq!(view.tag_name(), Some("div"));
    assert_eq!(view.node_type(), ELEMENT_NODE);
    assert_eq!(view.node_value(), None);
    assert!(view.parent_node().is_none());

    let kinds: Vec<u16> = view.child_nodes().map(|n| n.node_type()).collect();
    assert_eq!(kinds, vec![TEXT_NODE, COMMENT_NODE, CDATA_SECTION_NODE]);

    let first = view.first_child().expect("first child");
    assert_eq!(first.id(), text);
    assert_eq!(first.node_value(), Some("hi"));
    assert_eq!(first.parent_node().map(|n| n.id()), Some(div));
    assert_eq!(first.next_sibling().map(|n| n.id()), Some(comment));
    assert!(first.previous_sibling().is_none());
    assert_eq!(view.last_child().map(|n| n.id()), Some(cdata));
}

#[test]
fn test_level1_directive_reports_element_type() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::Directive(DirectiveData {
        name: "!doctype".to_string(),
        data: "!DOCTYPE html".to_string(),
    }));
    tree.append_root(doctype);
    let view = tree.node_ref(doctype).expect("directive exists");
    assert_eq!(view.node_type(), ELEMENT_NODE);
    assert_eq!(view.node_value(), Some("!DOCTYPE html"));
    assert_eq!(view.tag_name(), None);
}

#[test]
fn test_level1_setters_write_through() {
    let mut tree = DomTree::new();
    let span = alloc_element(&mut tree, "span");
    let text = alloc_text(&mut tree, "old");
    tree.append_root(span);
    tree.append_child(span, text);

    {
        let mut node = tree.node_mut(text).expect("text exists");
        assert!(node.set_node_value("new"));
        assert!(!node.set_tag_name("nope"));
        assert_eq!(node.as_node_ref().node_value(), Some("new"));
    }
    {
        let mut node = tree.node_mut(span).expect("span exists");
        assert!(node.set_tag_name("em"));
        assert!(!node.set_node_value("nope"));
    }

    assert_eq!(tree.as_text(text), Some("new"));
    assert_eq!(tree.as_element(span).map(|e| e.tag_name.as_str()), Some("em"));
}

#[test]
fn test_level1_missing_node() {
    let mut tree = DomTree::new();
    assert!(tree.node_ref(NodeId(3)).is_none());
    assert!(tree.node_mut(NodeId(0)).is_none());
}
