//! Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
///
/// Ids of removed nodes are recycled, so an id is only meaningful while the
/// node it was handed out for is still attached or held.
pub type NodeId = u32;

/// Type of node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment
    Comment,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document node and detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the element name, or 0
    pub name_id: u32,
    /// Element attributes in source order
    pub attributes: Vec<Attribute>,
    /// Character data for text and comment nodes
    pub data: String,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            attributes: Vec::new(),
            data: String::new(),
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document)
    }

    /// Create a new, unattached element node
    pub fn element(name_id: u32, attributes: Vec<Attribute>) -> Self {
        Node {
            name_id,
            attributes,
            ..Self::with_kind(NodeKind::Element)
        }
    }

    /// Create a new, unattached text node
    pub fn text(data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Self::with_kind(NodeKind::Text)
        }
    }

    /// Create a new, unattached comment node
    pub fn comment(data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Self::with_kind(NodeKind::Comment)
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Document and element nodes may hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

/// Stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Attribute value
    pub value: String,
}

impl Attribute {
    pub fn new(name_id: u32, value: impl Into<String>) -> Self {
        Attribute {
            name_id,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let doc = Node::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
        assert!(doc.is_container());
    }

    #[test]
    fn test_element_node() {
        let elem = Node::element(1, vec![Attribute::new(2, "search-highlight")]);
        assert_eq!(elem.kind, NodeKind::Element);
        assert_eq!(elem.name_id, 1);
        assert!(elem.has_attributes());
        assert!(!elem.has_children());
    }

    #[test]
    fn test_text_node() {
        let text = Node::text("namespaces");
        assert!(text.is_text());
        assert!(!text.is_container());
        assert_eq!(text.data, "namespaces");
    }
}
