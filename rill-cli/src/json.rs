//! JSON rendering of a [`DomTree`].

use rill_dom::{DomTree, NodeId, NodeType};
use serde_json::{Map, Value, json};

/// Render every root as a JSON object, in document order.
pub fn tree_to_json(tree: &DomTree) -> Value {
    Value::Array(
        tree.roots()
            .iter()
            .map(|&root| node_to_json(tree, root))
            .collect(),
    )
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let mut object = Map::new();
    let _ = object.insert("type".to_string(), json!(node.node_type.kind().to_string()));
    match &node.node_type {
        NodeType::Element(data) => {
            let _ = object.insert("name".to_string(), json!(data.tag_name));
            let attribs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let _ = object.insert("attribs".to_string(), Value::Object(attribs));
        }
        NodeType::Text(data) | NodeType::Comment(data) => {
            let _ = object.insert("data".to_string(), json!(data));
        }
        NodeType::Directive(data) => {
            let _ = object.insert("name".to_string(), json!(data.name));
            let _ = object.insert("data".to_string(), json!(data.data));
        }
        NodeType::Cdata => {}
    }
    if let Some(start) = node.start_index {
        let _ = object.insert("startIndex".to_string(), json!(start));
    }
    if let Some(end) = node.end_index {
        let _ = object.insert("endIndex".to_string(), json!(end));
    }
    let children = tree.children(id);
    if !children.is_empty() || matches!(node.node_type, NodeType::Element(_) | NodeType::Cdata) {
        let children: Vec<Value> = children
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect();
        let _ = object.insert("children".to_string(), Value::Array(children));
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_html::{DomHandlerOptions, ParserOptions, parse_document};

    #[test]
    fn test_element_json() {
        let tree = parse_document(
            "<a href=x>hi</a>",
            &ParserOptions::new(),
            DomHandlerOptions::new(),
        )
        .unwrap();
        assert_eq!(
            tree_to_json(&tree),
            json!([{
                "type": "element",
                "name": "a",
                "attribs": {"href": "x"},
                "children": [{"type": "text", "data": "hi"}]
            }])
        );
    }

    #[test]
    fn test_indices_in_json() {
        let tree = parse_document(
            "<!--c-->",
            &ParserOptions::new(),
            DomHandlerOptions::new().with_indices(true),
        )
        .unwrap();
        assert_eq!(
            tree_to_json(&tree),
            json!([{"type": "comment", "data": "c", "startIndex": 0, "endIndex": 7}])
        );
    }
}
