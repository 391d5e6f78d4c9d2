//! Tree-building handler.

use std::fmt;

use log::warn;
use rill_dom::{AttributesMap, DirectiveData, DomTree, ElementData, NodeId, NodeType};

use super::Handler;
use crate::error::ParseError;
use crate::lexer::Span;
use crate::options::DomHandlerOptions;

/// Called once per document with the finished tree or the first error.
pub type CompletionCallback = Box<dyn FnMut(Result<&DomTree, &ParseError>)>;

/// Called each time an element is closed.
pub type ElementCallback = Box<dyn FnMut(&DomTree, NodeId)>;

/// Builds a [`DomTree`] from structural events.
///
/// Keeps its own stack of open nodes, which mirrors the parser's stack of
/// open elements plus the comment or CDATA section being read, if any.
/// Adjacent text is merged into one node.
///
/// Errors do not stop the build. The first one is kept and handed to the
/// completion callback instead of the tree; without a callback it is
/// returned by [`into_result`](Self::into_result).
pub struct DomHandler {
    options: DomHandlerOptions,
    tree: DomTree,
    tag_stack: Vec<NodeId>,
    done: bool,
    error: Option<ParseError>,
    callback: Option<CompletionCallback>,
    element_callback: Option<ElementCallback>,
}

impl fmt::Debug for DomHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomHandler")
            .field("options", &self.options)
            .field("tree", &self.tree)
            .field("tag_stack", &self.tag_stack)
            .field("done", &self.done)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Default for DomHandler {
    fn default() -> Self {
        Self::new(DomHandlerOptions::default())
    }
}

impl DomHandler {
    /// Create a handler with no callbacks.
    #[must_use]
    pub const fn new(options: DomHandlerOptions) -> Self {
        Self {
            options,
            tree: DomTree::new(),
            tag_stack: Vec::new(),
            done: false,
            error: None,
            callback: None,
            element_callback: None,
        }
    }

    /// Deliver the result of each document to `callback`.
    #[must_use]
    pub fn with_callback(
        mut self,
        callback: impl FnMut(Result<&DomTree, &ParseError>) + 'static,
    ) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Report every closed element to `callback`.
    #[must_use]
    pub fn with_element_callback(
        mut self,
        callback: impl FnMut(&DomTree, NodeId) + 'static,
    ) -> Self {
        self.element_callback = Some(Box::new(callback));
        self
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// True once the document has ended.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// The first error seen, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Consume the handler and return the tree, errors or not.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// Consume the handler and return the tree, or the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] reported during the parse.
    pub fn into_result(self) -> Result<DomTree, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.tree),
        }
    }

    fn record_error(&mut self, error: ParseError) {
        warn!("{error}");
        if self.done
            && let Some(callback) = self.callback.as_mut()
        {
            callback(Err(&error));
        }
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn add_node(&mut self, node_type: NodeType, span: Span) -> NodeId {
        let id = self.tree.alloc(node_type);
        if let Some(node) = self.tree.get_mut(id) {
            if self.options.with_start_indices {
                node.start_index = Some(span.start);
            }
            if self.options.with_end_indices {
                node.end_index = Some(span.last());
            }
        }
        self.tree.append(self.tag_stack.last().copied(), id);
        id
    }

    fn set_end_index(&mut self, id: NodeId, end: usize) {
        if self.options.with_end_indices
            && let Some(node) = self.tree.get_mut(id)
        {
            node.end_index = Some(end);
        }
    }

    /// Pop the innermost open node, checking that it is what `expected`
    /// says it should be.
    fn pop_node(&mut self, name: &str, expected: impl Fn(&NodeType) -> bool) -> Option<NodeId> {
        let Some(id) = self.tag_stack.pop() else {
            self.record_error(ParseError::UnbalancedClose {
                name: name.to_string(),
            });
            return None;
        };
        let node_type = self.tree.get(id).map(|node| &node.node_type);
        if !node_type.is_some_and(expected) {
            let open = node_type.map_or_else(String::new, node_name);
            self.record_error(ParseError::TagMismatch {
                expected: open,
                found: name.to_string(),
            });
        }
        Some(id)
    }
}

/// `nodeName`-style label used in error messages.
fn node_name(node_type: &NodeType) -> String {
    match node_type {
        NodeType::Element(data) => data.tag_name.clone(),
        NodeType::Text(_) => "#text".to_string(),
        NodeType::Comment(_) => "#comment".to_string(),
        NodeType::Cdata => "#cdata-section".to_string(),
        NodeType::Directive(data) => data.name.clone(),
    }
}

/// Append `text` to `out` with every whitespace run collapsed to a single
/// space. A run continuing a space already at the end of `out` adds nothing,
/// so only the new piece is scanned.
fn push_collapsed(out: &mut String, text: &str) {
    let mut in_whitespace = out.ends_with(' ');
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
}

impl Handler for DomHandler {
    fn on_reset(&mut self) {
        self.tree = DomTree::new();
        self.tag_stack.clear();
        self.done = false;
        self.error = None;
    }

    fn on_open_tag(&mut self, name: &str, attrs: AttributesMap, span: Span) {
        let element = NodeType::Element(ElementData::new(name.to_string(), attrs));
        let id = self.add_node(element, span);
        self.tag_stack.push(id);
    }

    fn on_close_tag(&mut self, name: &str, span: Span) {
        let Some(id) = self.pop_node(name, |node| {
            matches!(node, NodeType::Element(data) if data.tag_name == name)
        }) else {
            return;
        };
        self.set_end_index(id, span.last());
        if let Some(callback) = self.element_callback.as_mut() {
            callback(&self.tree, id);
        }
    }

    fn on_text(&mut self, text: &str, span: Span) {
        let normalize = self.options.normalize_whitespace;
        let with_end_indices = self.options.with_end_indices;
        let parent = self.tag_stack.last().copied();
        let last = self.tree.children_of(parent).last().copied();

        if let Some(node) = last.and_then(|id| self.tree.get_mut(id))
            && let NodeType::Text(data) = &mut node.node_type
        {
            if normalize {
                push_collapsed(data, text);
            } else {
                data.push_str(text);
            }
            if with_end_indices {
                node.end_index = Some(span.last());
            }
            return;
        }

        let data = if normalize {
            let mut data = String::with_capacity(text.len());
            push_collapsed(&mut data, text);
            data
        } else {
            text.to_string()
        };
        let _ = self.add_node(NodeType::Text(data), span);
    }

    fn on_comment(&mut self, data: &str, span: Span) {
        if let Some(&id) = self.tag_stack.last()
            && let Some(node) = self.tree.get_mut(id)
            && let NodeType::Comment(existing) = &mut node.node_type
        {
            existing.push_str(data);
            return;
        }
        let id = self.add_node(NodeType::Comment(data.to_string()), span);
        self.tag_stack.push(id);
    }

    fn on_comment_end(&mut self, span: Span) {
        if let Some(id) = self.pop_node("#comment", |node| matches!(node, NodeType::Comment(_))) {
            self.set_end_index(id, span.last());
        }
    }

    fn on_cdata_start(&mut self, span: Span) {
        let id = self.add_node(NodeType::Cdata, span);
        self.tag_stack.push(id);
        // Section content is appended to this child by `on_text`.
        let _ = self.add_node(NodeType::Text(String::new()), span);
    }

    fn on_cdata_end(&mut self, span: Span) {
        if let Some(id) = self.pop_node("#cdata-section", |node| matches!(node, NodeType::Cdata)) {
            self.set_end_index(id, span.last());
        }
    }

    fn on_processing_instruction(&mut self, name: &str, data: &str, span: Span) {
        let directive = NodeType::Directive(DirectiveData {
            name: name.to_string(),
            data: data.to_string(),
        });
        let _ = self.add_node(directive, span);
    }

    fn on_error(&mut self, error: ParseError) {
        self.record_error(error);
    }

    fn on_end(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if let Some(callback) = self.callback.as_mut() {
            match &self.error {
                Some(error) => callback(Err(error)),
                None => callback(Ok(&self.tree)),
            }
        }
    }
}
