//! DOM Level 1 style accessors over [`DomTree`] nodes.
//!
//! [`NodeRef`] and [`NodeMut`] are adapters: they hold a reference to the
//! tree plus a [`NodeId`] and translate the conventional DOM property names
//! (`tagName`, `childNodes`, `parentNode`, ...) onto the plain node record.
//! Nothing is copied; the tree stays the single source of truth.

use crate::{DomTree, Node, NodeId, NodeType};

/// `nodeType` of an element.
pub const ELEMENT_NODE: u16 = 1;
/// `nodeType` of a text node.
pub const TEXT_NODE: u16 = 3;
/// `nodeType` of a CDATA section.
pub const CDATA_SECTION_NODE: u16 = 4;
/// `nodeType` of a comment.
pub const COMMENT_NODE: u16 = 8;

/// Read-only DOM Level 1 view of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Wrap `id`. Returns `None` if the tree has no such node.
    #[must_use]
    pub fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        tree.get(id).map(|_| Self { tree, id })
    }

    /// The wrapped node ID.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying node record.
    #[must_use]
    pub fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self {
            tree: self.tree,
            id,
        })
    }

    /// `tagName`: the element's tag name, `None` for other node kinds.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        match &self.node().node_type {
            NodeType::Element(data) => Some(&data.tag_name),
            _ => None,
        }
    }

    /// `childNodes`.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// `firstChild`.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.wrap(self.node().children.first().copied())
    }

    /// `lastChild`.
    #[must_use]
    pub fn last_child(&self) -> Option<Self> {
        self.wrap(self.node().children.last().copied())
    }

    /// `parentNode`.
    #[must_use]
    pub fn parent_node(&self) -> Option<Self> {
        self.wrap(self.node().parent)
    }

    /// `previousSibling`.
    #[must_use]
    pub fn previous_sibling(&self) -> Option<Self> {
        self.wrap(self.node().prev_sibling)
    }

    /// `nextSibling`.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.wrap(self.node().next_sibling)
    }

    /// `nodeValue`: character data of text and comment nodes, the raw data
    /// of directives, `None` for elements and CDATA sections.
    #[must_use]
    pub fn node_value(&self) -> Option<&'a str> {
        match &self.node().node_type {
            NodeType::Text(data) | NodeType::Comment(data) => Some(data),
            NodeType::Directive(directive) => Some(&directive.data),
            NodeType::Element(_) | NodeType::Cdata => None,
        }
    }

    /// `nodeType`.
    ///
    /// Directives have no code of their own in this model and report
    /// [`ELEMENT_NODE`].
    #[must_use]
    pub fn node_type(&self) -> u16 {
        node_type_code(&self.node().node_type)
    }
}

/// Writable DOM Level 1 view of one node.
#[derive(Debug)]
pub struct NodeMut<'a> {
    tree: &'a mut DomTree,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    /// Wrap `id` for writing. Returns `None` if the tree has no such node.
    #[must_use]
    pub fn new(tree: &'a mut DomTree, id: NodeId) -> Option<Self> {
        if tree.get(id).is_some() {
            Some(Self { tree, id })
        } else {
            None
        }
    }

    /// Read-only view of the same node.
    #[must_use]
    pub fn as_node_ref(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self.tree,
            id: self.id,
        }
    }

    /// Set `nodeValue`. Returns false (and changes nothing) for node kinds
    /// that have no value.
    pub fn set_node_value(&mut self, value: impl Into<String>) -> bool {
        match &mut self.tree.nodes[self.id.0].node_type {
            NodeType::Text(data) | NodeType::Comment(data) => {
                *data = value.into();
                true
            }
            NodeType::Directive(directive) => {
                directive.data = value.into();
                true
            }
            NodeType::Element(_) | NodeType::Cdata => false,
        }
    }

    /// Set `tagName`. Returns false (and changes nothing) for non-elements.
    pub fn set_tag_name(&mut self, name: impl Into<String>) -> bool {
        match &mut self.tree.nodes[self.id.0].node_type {
            NodeType::Element(data) => {
                data.tag_name = name.into();
                true
            }
            _ => false,
        }
    }
}

const fn node_type_code(node_type: &NodeType) -> u16 {
    match node_type {
        NodeType::Text(_) => TEXT_NODE,
        NodeType::Cdata => CDATA_SECTION_NODE,
        NodeType::Comment(_) => COMMENT_NODE,
        NodeType::Element(_) | NodeType::Directive(_) => ELEMENT_NODE,
    }
}

impl DomTree {
    /// DOM Level 1 view of `id`.
    #[must_use]
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::new(self, id)
    }

    /// Writable DOM Level 1 view of `id`.
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        NodeMut::new(self, id)
    }
}
