//! Markup serialisation
//!
//! Writes a subtree back out as HTML-style markup. Uses an explicit stack so
//! deeply nested pages cannot overflow the call stack.

use super::document::Document;
use super::node::{NodeId, NodeKind};
use crate::core::entities::{encode_attribute, encode_text};
use crate::core::tokenizer::{is_raw_text_element, is_void_element};

enum StackEntry {
    Enter(NodeId),
    Close(NodeId),
}

/// Serialise `node_id` including its own tag
pub fn outer_markup(doc: &Document, node_id: NodeId) -> String {
    let mut buf = String::with_capacity(1024);
    write_node(doc, node_id, &mut buf);
    buf
}

/// Serialise the children of `node_id`
pub fn inner_markup(doc: &Document, node_id: NodeId) -> String {
    let mut buf = String::with_capacity(1024);
    for child in doc.children(node_id) {
        write_node(doc, child, &mut buf);
    }
    buf
}

fn write_node(doc: &Document, node_id: NodeId, buf: &mut String) {
    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    stack.push(StackEntry::Enter(node_id));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id) => {
                if let Some(name) = doc.node_name(id) {
                    buf.push_str("</");
                    buf.push_str(name);
                    buf.push('>');
                }
            }
            StackEntry::Enter(current_id) => {
                let Some(node) = doc.get_node(current_id) else {
                    continue;
                };

                match node.kind {
                    NodeKind::Element => {
                        let name = doc.node_name(current_id).unwrap_or("");
                        buf.push('<');
                        buf.push_str(name);
                        for (attr_name, attr_value) in doc.get_attribute_values(current_id) {
                            buf.push(' ');
                            buf.push_str(attr_name);
                            buf.push_str("=\"");
                            buf.push_str(&encode_attribute(attr_value));
                            buf.push('"');
                        }
                        buf.push('>');

                        if is_void_element(name) {
                            continue;
                        }

                        stack.push(StackEntry::Close(current_id));
                        let mut child_id = node.last_child;
                        while let Some(cid) = child_id {
                            stack.push(StackEntry::Enter(cid));
                            child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                        }
                    }
                    NodeKind::Text => {
                        let in_raw_text = node
                            .parent
                            .and_then(|p| doc.node_name(p))
                            .is_some_and(is_raw_text_element);
                        if in_raw_text {
                            buf.push_str(&node.data);
                        } else {
                            buf.push_str(&encode_text(&node.data));
                        }
                    }
                    NodeKind::Comment => {
                        buf.push_str("<!--");
                        buf.push_str(&node.data);
                        buf.push_str("-->");
                    }
                    NodeKind::Document => {
                        let mut child_id = node.last_child;
                        while let Some(cid) = child_id {
                            stack.push(StackEntry::Enter(cid));
                            child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::document::DOCUMENT_NODE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_simple() {
        let src = "<main id=\"mainContent\"><p>Hello <b>world</b></p></main>";
        let doc = Document::parse(src);
        assert_eq!(outer_markup(&doc, DOCUMENT_NODE), src);
    }

    #[test]
    fn test_void_and_empty_elements() {
        let doc = Document::parse("<p>a<br/>b<span></span></p>");
        assert_eq!(outer_markup(&doc, DOCUMENT_NODE), "<p>a<br>b<span></span></p>");
    }

    #[test]
    fn test_escaping() {
        let doc = Document::parse("<p title='say \"hi\"'>1 &lt; 2 &amp; 3</p>");
        assert_eq!(
            outer_markup(&doc, DOCUMENT_NODE),
            "<p title=\"say &quot;hi&quot;\">1 &lt; 2 &amp; 3</p>"
        );
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let src = "<script>if (a < b && c) {}</script>";
        let doc = Document::parse(src);
        assert_eq!(outer_markup(&doc, DOCUMENT_NODE), src);
    }

    #[test]
    fn test_inner_markup_and_comments() {
        let doc = Document::parse("<div><!-- note --><i>x</i></div>");
        let div = doc.root_element_id().unwrap();
        assert_eq!(inner_markup(&doc, div), "<!-- note --><i>x</i>");
    }
}
