//! Text leaf enumeration
//!
//! Collects, in document order, the text nodes a search may touch. Subtrees
//! of skipped elements (script, style) and of existing markers are pruned
//! whole, so exclusion holds for every ancestor and not only the parent.

use crate::dom::{ContentTree, NodeId, NodeKind};

/// Which elements a walk must not descend into
#[derive(Debug, Clone, Copy)]
pub struct Exclusions<'a> {
    pub skip_tags: &'a [String],
    pub marker_tag: &'a str,
    pub marker_class: &'a str,
}

impl Exclusions<'_> {
    /// Whether `id` is an element whose subtree is out of bounds
    pub fn is_pruned<T: ContentTree + ?Sized>(&self, tree: &T, id: NodeId) -> bool {
        let Some(tag) = tree.tag_name(id) else {
            return false;
        };
        self.skip_tags.iter().any(|skip| skip.eq_ignore_ascii_case(tag)) || self.is_marker(tree, id)
    }

    /// Whether `id` is a highlight marker
    pub fn is_marker<T: ContentTree + ?Sized>(&self, tree: &T, id: NodeId) -> bool {
        tree.tag_name(id).is_some_and(|tag| tag.eq_ignore_ascii_case(self.marker_tag))
            && tree.has_class(id, self.marker_class)
    }
}

/// Text nodes under `root` (exclusive) outside pruned subtrees
pub fn text_leaves<T: ContentTree + ?Sized>(tree: &T, root: NodeId, exclusions: &Exclusions<'_>) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut stack: Vec<NodeId> = tree.children(root).into_iter().rev().collect();

    while let Some(current) = stack.pop() {
        match tree.kind(current) {
            Some(NodeKind::Text) => leaves.push(current),
            Some(NodeKind::Element) if !exclusions.is_pruned(tree, current) => {
                stack.extend(tree.children(current).into_iter().rev());
            }
            _ => {}
        }
    }

    leaves
}

/// Markers under `root` in document order
pub fn markers<T: ContentTree + ?Sized>(tree: &T, root: NodeId, exclusions: &Exclusions<'_>) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&id| exclusions.is_marker(tree, id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use pretty_assertions::assert_eq;

    fn leaf_texts(src: &str) -> Vec<String> {
        let doc = Document::parse(src);
        let root = doc.root_element_id().unwrap();
        let skip = vec!["script".to_string(), "style".to_string()];
        let exclusions = Exclusions {
            skip_tags: &skip,
            marker_tag: "span",
            marker_class: "search-highlight",
        };
        text_leaves(&doc, root, &exclusions)
            .into_iter()
            .map(|id| ContentTree::text(&doc, id).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_document_order() {
        assert_eq!(leaf_texts("<main>a<p>b<i>c</i></p>d</main>"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_skips_script_style_and_comments() {
        assert_eq!(
            leaf_texts("<main>a<script>var b;</script><!-- c --><style>p{}</style>d</main>"),
            vec!["a", "d"]
        );
    }

    #[test]
    fn test_skips_nested_inside_script_ancestor() {
        // Raw text keeps script content as one text node; a foreign tree
        // could still nest elements, so the whole subtree is pruned.
        let mut doc = Document::parse("<main><script></script>x</main>");
        let main = doc.root_element_id().unwrap();
        let script = doc.children(main).next().unwrap();
        let b = doc.create_element("b", &[]);
        let t = doc.create_text("hidden");
        doc.append_child(b, t);
        doc.append_child(script, b);

        let skip = vec!["script".to_string()];
        let exclusions = Exclusions {
            skip_tags: &skip,
            marker_tag: "span",
            marker_class: "search-highlight",
        };
        let leaves = text_leaves(&doc, main, &exclusions);
        assert_eq!(leaves.len(), 1);
        assert_eq!(ContentTree::text(&doc, leaves[0]), Some("x"));
    }

    #[test]
    fn test_skips_markers() {
        assert_eq!(
            leaf_texts("<main>a<span class=\"search-highlight\">b</span><span class=\"x\">c</span></main>"),
            vec!["a", "c"]
        );
    }
}
