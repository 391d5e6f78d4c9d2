//! Debug rendering of a [`DomTree`].

use std::fmt::Write;

use rill_dom::{DomTree, NodeId, NodeType};

/// Print the whole tree to stdout, one node per line.
pub fn print_tree(tree: &DomTree) {
    print!("{}", format_tree(tree));
}

/// Render the whole tree, one node per line, children indented by two
/// spaces. Attributes are sorted by name so the output is stable.
#[must_use]
pub fn format_tree(tree: &DomTree) -> String {
    let mut out = String::new();
    for &root in tree.roots() {
        write_node(tree, root, 0, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let line = match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort_by_key(|(name, _)| *name);
            let attrs: String = attrs
                .into_iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        format!(" {k}")
                    } else {
                        format!(" {k}=\"{v}\"")
                    }
                })
                .collect();
            format!("<{}{attrs}>", data.tag_name)
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeType::Comment(data) => format!("<!-- {data} -->"),
        NodeType::Cdata => "<![CDATA[ ]]>".to_string(),
        NodeType::Directive(data) => format!("<{}>", data.data),
    };
    let _ = write!(out, "{prefix}{line}");
    match (node.start_index, node.end_index) {
        (Some(start), Some(end)) => {
            let _ = write!(out, " [{start}..={end}]");
        }
        (Some(start), None) => {
            let _ = write!(out, " [{start}..]");
        }
        (None, Some(end)) => {
            let _ = write!(out, " [..={end}]");
        }
        (None, None) => {}
    }
    out.push('\n');
    for &child in tree.children(id) {
        write_node(tree, child, indent + 1, out);
    }
}
