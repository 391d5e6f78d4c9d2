//! Document tree for the rill HTML parser.
//!
//! This crate provides the arena-based node tree that the rill tree builder
//! produces, plus a DOM Level 1 style view over it (see [`level1`]).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! Ownership flows from the arena through each parent's child list; the
//! `parent`, `prev_sibling` and `next_sibling` links are plain indices and
//! never own anything.
//!
//! A parse may yield several top-level nodes (an HTML fragment has no single
//! document element), so the tree keeps an ordered list of roots instead of a
//! synthetic document node. A node's `parent` is `None` exactly when it is one
//! of those roots.

pub mod level1;

use std::collections::HashMap;

use strum_macros::{Display, IntoStaticStr};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A single node in the tree.
///
/// Relationships are stored as indices, enabling O(1) traversal in any
/// direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,

    /// The containing node, or `None` for a root-level node.
    pub parent: Option<NodeId>,

    /// Child nodes in document order. Only elements and CDATA sections have
    /// children.
    pub children: Vec<NodeId>,

    /// The node immediately following this one under the same parent.
    pub next_sibling: Option<NodeId>,

    /// The node immediately preceding this one under the same parent.
    pub prev_sibling: Option<NodeId>,

    /// Byte offset into the source where this node starts, when the tree
    /// builder was asked to record it.
    pub start_index: Option<usize>,

    /// Byte offset into the source of the last byte of this node
    /// (inclusive), when the tree builder was asked to record it.
    pub end_index: Option<usize>,
}

/// The payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
    /// A comment's character data.
    Comment(String),
    /// A CDATA section. Its content is held by a single Text child.
    Cdata,
    /// A declaration (`<!...>`) or processing instruction (`<?...?>`).
    Directive(DirectiveData),
}

impl NodeType {
    /// The kind tag of this payload.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
            Self::Cdata => NodeKind::Cdata,
            Self::Directive(_) => NodeKind::Directive,
        }
    }
}

/// Payload-free discriminant of [`NodeType`], used for display and dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// See [`NodeType::Element`].
    Element,
    /// See [`NodeType::Text`].
    Text,
    /// See [`NodeType::Comment`].
    Comment,
    /// See [`NodeType::Cdata`].
    Cdata,
    /// See [`NodeType::Directive`].
    Directive,
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's tag name, already case-normalized by the parser.
    pub tag_name: String,
    /// The element's attributes. Duplicate names never reach this map: the
    /// first occurrence on the tag is kept.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with the given tag name and attributes.
    #[must_use]
    pub const fn new(tag_name: String, attrs: AttributesMap) -> Self {
        Self { tag_name, attrs }
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Declaration or processing-instruction data.
///
/// Both fields carry the `!` or `?` prefix: `<!DOCTYPE html>` becomes name
/// `!doctype`, data `!DOCTYPE html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveData {
    /// Prefixed first word of the directive.
    pub name: String,
    /// Prefixed raw directive content.
    pub data: String,
}

/// Arena-based tree with O(1) node access and traversal.
///
/// All nodes live in one contiguous vector and refer to each other by
/// [`NodeId`]. Root-level nodes are listed, in order, by [`DomTree::roots`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// The root-level nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node ID in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            start_index: None,
            end_index: None,
        });
        id
    }

    /// Appends `child` as the last child of `parent`, or as the last root
    /// when `parent` is `None`, updating all relationships.
    pub fn append(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent {
            Some(parent) => self.append_child(parent, child),
            None => self.append_root(child),
        }
    }

    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.link_after(prev_last_child, child);
    }

    /// Appends `child` as the last root-level node.
    pub fn append_root(&mut self, child: NodeId) {
        let prev_last_root = self.roots.last().copied();
        self.roots.push(child);
        self.nodes[child.0].parent = None;
        self.link_after(prev_last_root, child);
    }

    fn link_after(&mut self, prev: Option<NodeId>, child: NodeId) {
        self.nodes[child.0].next_sibling = None;
        self.nodes[child.0].prev_sibling = prev;
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The children of `parent`, or the roots when `parent` is `None`.
    #[must_use]
    pub fn children_of(&self, parent: Option<NodeId>) -> &[NodeId] {
        parent.map_or(self.roots.as_slice(), |id| self.children(id))
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get comment data if this node is a comment.
    #[must_use]
    pub fn as_comment(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Comment(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all Text descendants of `id` (including `id`
    /// itself), in document order. Comments and directives contribute nothing.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(data)) => out.push_str(data),
            Some(NodeType::Element(_) | NodeType::Cdata) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Find the first element with the given tag name, depth-first in
    /// document order, across all roots.
    #[must_use]
    pub fn find_element(&self, tag_name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .find_map(|&root| self.find_element_from(root, tag_name))
    }

    /// Find the first element with the given tag name at or below `from`.
    #[must_use]
    pub fn find_element_from(&self, from: NodeId, tag_name: &str) -> Option<NodeId> {
        if self.as_element(from).is_some_and(|e| e.tag_name == tag_name) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|&child| self.find_element_from(child, tag_name))
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}
