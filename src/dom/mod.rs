//! DOM Module - Arena-based content tree
//!
//! Implements a mutable DOM representation using:
//! - Arena allocation for nodes, with id recycling
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for element/attribute names
//!
//! The highlight engine never touches [`Document`] directly; it is written
//! against [`ContentTree`], the walk-and-mutate capability a host page offers.

pub mod document;
pub mod node;
pub mod serialize;
pub mod strings;

pub use document::{Document, DOCUMENT_NODE};
pub use node::{Attribute, Node, NodeId, NodeKind};
pub use serialize::{inner_markup, outer_markup};
pub use strings::StringPool;

/// Tree walk and mutation over a content tree
pub trait ContentTree {
    /// Kind of node, or None if the id is not live
    fn kind(&self, id: NodeId) -> Option<NodeKind>;

    fn parent(&self, id: NodeId) -> Option<NodeId>;

    fn first_child(&self, id: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, id: NodeId) -> Option<NodeId>;

    /// Lowercase element name; None for non-elements
    fn tag_name(&self, id: NodeId) -> Option<&str>;

    /// Whether an element's class list contains `class`
    fn has_class(&self, id: NodeId, class: &str) -> bool;

    /// Character data of a text node
    fn text(&self, id: NodeId) -> Option<&str>;

    /// Create an unattached text node
    fn create_text(&mut self, data: &str) -> NodeId;

    /// Create an unattached `<tag class="class">data</tag>` element
    fn create_marker(&mut self, tag: &str, class: &str, data: &str) -> NodeId;

    /// Insert `node` into `parent` before `reference` (append when None)
    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) -> bool;

    /// Detach and discard a node with its subtree
    fn remove(&mut self, id: NodeId);

    /// Merge adjacent text nodes and drop empty ones under `id`
    fn normalize(&mut self, id: NodeId);

    /// Put `new` where `old` is and discard `old`
    fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        if !self.insert_before(parent, new, Some(old)) {
            return false;
        }
        self.remove(old);
        true
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut child = self.first_child(id);
        while let Some(cid) = child {
            out.push(cid);
            child = self.next_sibling(cid);
        }
        out
    }

    /// All descendants of `id` in document order
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    /// Concatenated text of every text node in the subtree
    fn text_content(&self, id: NodeId) -> String {
        if let Some(data) = self.text(id) {
            return data.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|nid| self.text(nid))
            .collect()
    }
}

impl ContentTree for Document {
    fn kind(&self, id: NodeId) -> Option<NodeKind> {
        Document::kind(self, id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        Document::parent(self, id)
    }

    fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.first_child)
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.next_sibling)
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node_name(id)
    }

    fn has_class(&self, id: NodeId, class: &str) -> bool {
        Document::has_class(self, id, class)
    }

    fn text(&self, id: NodeId) -> Option<&str> {
        self.get_node(id)
            .filter(|n| n.is_text())
            .map(|n| n.data.as_str())
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        Document::create_text(self, data)
    }

    fn create_marker(&mut self, tag: &str, class: &str, data: &str) -> NodeId {
        let marker = self.create_element(tag, &[("class", class)]);
        let text = Document::create_text(self, data);
        self.append_child(marker, text);
        marker
    }

    fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) -> bool {
        Document::insert_before(self, parent, node, reference)
    }

    fn remove(&mut self, id: NodeId) {
        Document::remove(self, id);
    }

    fn normalize(&mut self, id: NodeId) {
        Document::normalize(self, id);
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        Document::children(self, id).collect()
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        Document::descendants(self, id).collect()
    }

    fn text_content(&self, id: NodeId) -> String {
        Document::text_content(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_marker() {
        let mut doc = Document::parse("<p>x</p>");
        let p = doc.root_element_id().unwrap();
        let marker = ContentTree::create_marker(&mut doc, "span", "search-highlight", "x");
        assert!(ContentTree::insert_before(&mut doc, p, marker, None));
        assert_eq!(ContentTree::tag_name(&doc, marker), Some("span"));
        assert!(ContentTree::has_class(&doc, marker, "search-highlight"));
        assert_eq!(ContentTree::text_content(&doc, marker), "x");
        assert_eq!(outer_markup(&doc, p), "<p>x<span class=\"search-highlight\">x</span></p>");
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = Document::parse("<p>a<i>b</i>c</p>");
        let p = doc.root_element_id().unwrap();
        let i = ContentTree::children(&doc, p)[1];
        let b = ContentTree::create_text(&mut doc, "B");
        assert!(ContentTree::replace(&mut doc, i, b));
        assert_eq!(ContentTree::text_content(&doc, p), "aBc");
        assert_eq!(ContentTree::kind(&doc, i), None);
    }

    #[test]
    fn test_default_descendants_order() {
        let doc = Document::parse("<a><b><c></c></b><d></d></a>");
        let a = doc.root_element_id().unwrap();
        let names: Vec<_> = ContentTree::descendants(&doc, a)
            .into_iter()
            .filter_map(|id| ContentTree::tag_name(&doc, id))
            .collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }
}
