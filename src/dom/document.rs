//! Document - Arena-based DOM representation
//!
//! Mutable DOM storage with:
//! - Arena allocation for nodes, with a free list for removed subtrees
//! - NodeId indices for traversal
//! - String interning for element and attribute names
//! - Owned character data so text nodes can be split and merged

use super::node::{Attribute, Node, NodeId, NodeKind};
use super::strings::StringPool;
use crate::core::tokenizer::{is_void_element, ParseError};
use crate::error::{Error, Result};
use crate::reader::events::{MarkupEvent, StartElement};
use crate::reader::slice::SliceReader;

/// Id of the document node, always the first arena slot
pub const DOCUMENT_NODE: NodeId = 0;

/// A markup document stored in arena format
#[derive(Debug)]
pub struct Document {
    /// Arena of nodes; `None` marks a released slot
    nodes: Vec<Option<Node>>,
    /// Released slots available for reuse
    free: Vec<NodeId>,
    /// Interned element and attribute names
    pub strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document node
    pub fn new() -> Self {
        Document {
            nodes: vec![Some(Node::document())],
            free: Vec::new(),
            strings: StringPool::new(),
            root_element: None,
        }
    }

    /// Parse markup (lenient mode never fails)
    pub fn parse(input: &str) -> Self {
        let mut doc = Self::new();
        doc.nodes.reserve(input.len() / 16);
        // Every error site in the builder is gated on `strict`
        let _ = doc.build_from_events(input.as_bytes(), false);
        doc
    }

    /// Parse markup in strict mode
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`] for unterminated constructs, mismatched or
    /// unexpected end tags, and elements left open at end of input.
    pub fn parse_strict(input: &str) -> Result<Self> {
        let mut doc = Self::new();
        doc.build_from_events(input.as_bytes(), true)
            .map_err(|err| Error::Markup {
                message: err.message,
                position: err.position,
            })?;
        Ok(doc)
    }

    /// Build DOM from markup events
    fn build_from_events(&mut self, input: &[u8], strict: bool) -> std::result::Result<(), ParseError> {
        let mut reader = if strict {
            SliceReader::new_strict(input)
        } else {
            SliceReader::new(input)
        };
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];

        while let Some(event) = reader.next_event() {
            let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);

            match event {
                MarkupEvent::StartElement(elem) => {
                    let name = String::from_utf8_lossy(elem.name.as_ref()).into_owned();
                    let node_id = self.handle_element(&elem, parent_id);
                    if !is_void_element(&name) {
                        stack.push(node_id);
                    }
                }

                MarkupEvent::EmptyElement(elem) => {
                    self.handle_element(&elem, parent_id);
                }

                MarkupEvent::EndElement(end_elem) => {
                    let name = String::from_utf8_lossy(end_elem.name.as_ref());
                    let open_at = stack
                        .iter()
                        .rposition(|&id| id != DOCUMENT_NODE && self.node_name(id) == Some(&*name));

                    match open_at {
                        Some(index) if strict && index + 1 != stack.len() => {
                            let open = self.node_name(*stack.last().unwrap_or(&DOCUMENT_NODE)).unwrap_or("");
                            return Err(ParseError::new(
                                format!("Tag mismatch: <{open}> closed with </{name}>"),
                                reader.position(),
                            ));
                        }
                        Some(index) => stack.truncate(index),
                        None if strict && !is_void_element(&name) => {
                            return Err(ParseError::new(
                                format!("Unexpected end tag: </{name}> without matching start tag"),
                                reader.position(),
                            ));
                        }
                        // Stray end tags are dropped, as browsers do
                        None => {}
                    }
                }

                MarkupEvent::Text(content) => {
                    let text = String::from_utf8_lossy(content.as_ref());
                    self.append_text(parent_id, &text);
                }

                MarkupEvent::Comment(content) => {
                    let node_id = self.alloc(Node::comment(String::from_utf8_lossy(content.as_ref())));
                    self.link_last(parent_id, node_id);
                }

                MarkupEvent::DocType(_) => {}

                MarkupEvent::EndDocument => break,
            }

            if strict {
                if let Some(err) = reader.error() {
                    return Err(err.clone());
                }
            }
        }

        if strict {
            if let Some(err) = reader.error() {
                return Err(err.clone());
            }
            if let Some(&unclosed) = stack.get(1) {
                let name = self.node_name(unclosed).unwrap_or("");
                return Err(ParseError::new(format!("Unclosed tag: <{name}>"), input.len()));
            }
        }

        Ok(())
    }

    /// Create an element from a start tag and append it to `parent_id`
    fn handle_element(&mut self, elem: &StartElement<'_>, parent_id: NodeId) -> NodeId {
        let name_id = self.strings.intern(&String::from_utf8_lossy(elem.name.as_ref()));

        let attributes = elem
            .attributes
            .iter()
            .map(|attr| {
                let name_id = self.strings.intern(&String::from_utf8_lossy(attr.name.as_ref()));
                Attribute::new(name_id, String::from_utf8_lossy(attr.value.as_ref()))
            })
            .collect();

        let node_id = self.alloc(Node::element(name_id, attributes));
        self.link_last(parent_id, node_id);

        if self.root_element.is_none() && parent_id == DOCUMENT_NODE {
            self.root_element = Some(node_id);
        }

        node_id
    }

    /// Append character data to `parent_id`, extending a trailing text node
    fn append_text(&mut self, parent_id: NodeId, text: &str) {
        let last = self.get_node(parent_id).and_then(|n| n.last_child);
        if let Some(last_node) = last.and_then(|id| self.get_node_mut(id)) {
            if last_node.is_text() {
                last_node.data.push_str(text);
                return;
            }
        }
        let node_id = self.alloc(Node::text(text));
        self.link_last(parent_id, node_id);
    }

    // =========================================================================
    // Arena management
    // =========================================================================

    /// Store a node, reusing a released slot when one is available
    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id as usize] = Some(node);
            id
        } else {
            let id = self.nodes.len() as NodeId;
            self.nodes.push(Some(node));
            id
        }
    }

    /// Release a detached subtree's slots to the free list
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current as usize).and_then(Option::take) else {
                continue;
            };
            let mut child = node.first_child;
            while let Some(cid) = child {
                child = self.get_node(cid).and_then(|n| n.next_sibling);
                stack.push(cid);
            }
            if current != DOCUMENT_NODE {
                self.free.push(current);
            }
        }
    }

    /// Link a detached child as the last child of `parent_id`
    fn link_last(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.link_before(parent_id, child_id, None);
    }

    /// Link a detached child before `reference` (or last when None)
    fn link_before(&mut self, parent_id: NodeId, child_id: NodeId, reference: Option<NodeId>) {
        let prev = match reference {
            Some(ref_id) => self.get_node(ref_id).and_then(|n| n.prev_sibling),
            None => self.get_node(parent_id).and_then(|n| n.last_child),
        };

        if let Some(child) = self.get_node_mut(child_id) {
            child.parent = Some(parent_id);
            child.prev_sibling = prev;
            child.next_sibling = reference;
        }

        match prev.and_then(|id| self.get_node_mut(id)) {
            Some(prev_node) => prev_node.next_sibling = Some(child_id),
            None => {
                if let Some(parent) = self.get_node_mut(parent_id) {
                    parent.first_child = Some(child_id);
                }
            }
        }

        match reference.and_then(|id| self.get_node_mut(id)) {
            Some(ref_node) => ref_node.prev_sibling = Some(child_id),
            None => {
                if let Some(parent) = self.get_node_mut(parent_id) {
                    parent.last_child = Some(child_id);
                }
            }
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Create an unattached element with the given attributes
    pub fn create_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        let name_id = self.strings.intern(name);
        let attributes = attributes
            .iter()
            .map(|(attr_name, value)| Attribute::new(self.strings.intern(attr_name), *value))
            .collect();
        self.alloc(Node::element(name_id, attributes))
    }

    /// Create an unattached text node
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(Node::text(data))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (or last when None),
    /// detaching it from its current position first.
    ///
    /// Returns false and leaves the tree untouched when the insertion would be
    /// invalid: unknown ids, a non-container parent, a reference that is not a
    /// child of `parent`, or a cycle.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> bool {
        let parent_ok = self.get_node(parent).is_some_and(Node::is_container);
        let child_ok = child != DOCUMENT_NODE && self.get_node(child).is_some();
        let reference_ok = match reference {
            Some(ref_id) => ref_id != child && self.parent(ref_id) == Some(parent),
            None => true,
        };
        if !parent_ok || !child_ok || !reference_ok || self.is_inclusive_ancestor(child, parent) {
            return false;
        }

        self.detach(child);
        self.link_before(parent, child, reference);

        if parent == DOCUMENT_NODE && self.root_element.is_none() && self.get_node(child).is_some_and(Node::is_element) {
            self.root_element = Some(child);
        }
        true
    }

    /// Unlink a node from its parent and siblings, keeping its subtree
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        if let Some(parent_id) = parent {
            match prev.and_then(|pid| self.get_node_mut(pid)) {
                Some(prev_node) => prev_node.next_sibling = next,
                None => {
                    if let Some(parent_node) = self.get_node_mut(parent_id) {
                        parent_node.first_child = next;
                    }
                }
            }
            match next.and_then(|nid| self.get_node_mut(nid)) {
                Some(next_node) => next_node.prev_sibling = prev,
                None => {
                    if let Some(parent_node) = self.get_node_mut(parent_id) {
                        parent_node.last_child = prev;
                    }
                }
            }
        }

        if let Some(node) = self.get_node_mut(id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }

        if self.root_element == Some(id) {
            self.root_element = None;
        }
    }

    /// Detach a node and release its whole subtree. Its id (and the ids of
    /// its descendants) may be handed out again by later allocations.
    pub fn remove(&mut self, id: NodeId) {
        if id == DOCUMENT_NODE || self.get_node(id).is_none() {
            return;
        }
        self.detach(id);
        self.release(id);
    }

    /// Merge adjacent text nodes and drop empty ones throughout the subtree
    /// rooted at `id`.
    pub fn normalize(&mut self, id: NodeId) {
        let containers: Vec<NodeId> = std::iter::once(id)
            .chain(self.descendants(id))
            .filter(|&nid| self.get_node(nid).is_some_and(Node::is_container))
            .collect();

        for container in containers {
            let mut child = self.get_node(container).and_then(|n| n.first_child);
            while let Some(cid) = child {
                let next = self.get_node(cid).and_then(|n| n.next_sibling);
                if !self.get_node(cid).is_some_and(Node::is_text) {
                    child = next;
                    continue;
                }

                // Pull every following text sibling into this one
                let mut follower = next;
                while let Some(fid) = follower.filter(|&f| self.get_node(f).is_some_and(Node::is_text)) {
                    follower = self.get_node(fid).and_then(|n| n.next_sibling);
                    let data = self.get_node_mut(fid).map(|n| std::mem::take(&mut n.data)).unwrap_or_default();
                    if let Some(node) = self.get_node_mut(cid) {
                        node.data.push_str(&data);
                    }
                    self.remove(fid);
                }

                if self.get_node(cid).is_some_and(|n| n.data.is_empty()) {
                    self.remove(cid);
                }
                child = follower;
            }
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Get the root element (first element child of document)
    pub fn root_element(&self) -> Option<&Node> {
        self.root_element.and_then(|id| self.get_node(id))
    }

    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize).and_then(Option::as_ref)
    }

    /// Get a mutable node by ID
    #[inline]
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id as usize).and_then(Option::as_mut)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get_node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    /// Get element name as string
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get attributes for an element
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.get_node(id).map_or(&[], |n| n.attributes.as_slice())
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        let name_id = self.strings.lookup(name)?;
        self.attributes(node_id)
            .iter()
            .find(|attr| attr.name_id == name_id)
            .map(|attr| attr.value.as_str())
    }

    /// Get all attribute names and values for a node
    pub fn get_attribute_values(&self, node_id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(node_id)
            .iter()
            .filter_map(|attr| Some((self.strings.get_str(attr.name_id)?, attr.value.as_str())))
            .collect()
    }

    /// Whether the element's whitespace-separated `class` list contains `class`
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Find the first element (document order) whose `id` attribute equals `element_id`
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let id_name = self.strings.lookup("id")?;
        self.descendants(DOCUMENT_NODE).find(|&nid| {
            self.attributes(nid)
                .iter()
                .any(|attr| attr.name_id == id_name && attr.value == element_id)
        })
    }

    /// All elements under `root` (exclusive) carrying `class`, in document order
    pub fn elements_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&nid| self.has_class(nid, class))
            .collect()
    }

    /// Concatenated character data of every text node in the subtree
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get_node(id) else {
            return String::new();
        };
        match node.kind {
            NodeKind::Text | NodeKind::Comment => node.data.clone(),
            NodeKind::Element | NodeKind::Document => {
                let mut result = String::new();
                for nid in self.descendants(id) {
                    if let Some(text) = self.get_node(nid).filter(|n| n.is_text()) {
                        result.push_str(&text.data);
                    }
                }
                result
            }
        }
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor {
                return true;
            }
            current = self.parent(cid);
        }
        false
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        // Initialize stack with all children in reverse order (so first is processed first)
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Number of live nodes, the document node included
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Number of arena slots ever allocated
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first, document order)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Add children to stack in reverse order (so first child is processed first)
        if let Some(node) = self.doc.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.doc.get_node(id).and_then(|n| n.prev_sibling);
            }
        }

        Some(current)
    }
}
