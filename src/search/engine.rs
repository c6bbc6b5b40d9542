//! Highlight engine
//!
//! `search` wraps every match inside the content root in a marker element;
//! `clear` turns markers back into plain text and re-merges the text nodes
//! they split. Every search starts with a clear, so running a search any
//! number of times leaves at most one generation of markers in the tree.

use super::cache::MatcherCache;
use super::viewport::{ScrollIntoView, Viewport};
use super::walker::{self, Exclusions};
use crate::config::GuideConfig;
use crate::dom::{ContentTree, NodeId};
use crate::error::Result;
use tracing::{debug, warn};

/// Outcome of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchSummary {
    /// Markers created
    pub markers: usize,
    /// First marker in document order
    pub first_marker: Option<NodeId>,
}

/// Search-and-highlight over a [`ContentTree`]
pub struct HighlightEngine {
    marker_tag: String,
    marker_class: String,
    skip_tags: Vec<String>,
    min_query_chars: usize,
    matchers: MatcherCache,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::from_valid(&GuideConfig::default())
    }
}

impl HighlightEngine {
    /// Build an engine from `config`
    ///
    /// The marker tag and class must identify markers unambiguously, or
    /// `clear` could not find them again; invalid settings are rejected.
    pub fn new(config: &GuideConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &GuideConfig) -> Self {
        HighlightEngine {
            marker_tag: config.marker_tag.to_ascii_lowercase(),
            marker_class: config.marker_class.clone(),
            skip_tags: config.skip_tags.clone(),
            min_query_chars: config.min_query_chars,
            matchers: MatcherCache::new(config.matcher_cache_capacity),
        }
    }

    fn exclusions(&self) -> Exclusions<'_> {
        Exclusions {
            skip_tags: &self.skip_tags,
            marker_tag: &self.marker_tag,
            marker_class: &self.marker_class,
        }
    }

    /// Whether a query is long enough to search for once trimmed
    ///
    /// Length is counted in `char`s, so an astral character such as an emoji
    /// counts once (a UTF-16 `length` would count it twice).
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_chars
    }

    /// Highlight every occurrence of `query` in the text under `root`
    ///
    /// Previous highlights are always removed first. A trimmed query shorter
    /// than the minimum length stops there. When markers were created, the
    /// first one is scrolled into view.
    pub fn search<T, V>(&mut self, tree: &mut T, root: NodeId, query: &str, viewport: &mut V) -> SearchSummary
    where
        T: ContentTree + ?Sized,
        V: Viewport + ?Sized,
    {
        if tree.kind(root).is_none() {
            warn!(root, "search root is not in the tree");
            return SearchSummary::default();
        }

        self.clear(tree, root);

        let query = query.trim();
        if !self.is_searchable(query) {
            debug!(query, "query below minimum length; highlights cleared");
            return SearchSummary::default();
        }

        let matcher = self.matchers.get(query);
        let leaves = walker::text_leaves(&*tree, root, &self.exclusions());
        let mut summary = SearchSummary::default();

        for leaf in leaves {
            let Some(text) = tree.text(leaf).map(str::to_owned) else {
                continue;
            };
            let ranges = matcher.find_all(&text);
            if ranges.is_empty() {
                continue;
            }
            let Some(parent) = tree.parent(leaf) else {
                warn!(leaf, "text node without parent skipped");
                continue;
            };

            let mut cursor = 0;
            for range in ranges {
                if range.start > cursor {
                    let plain = tree.create_text(&text[cursor..range.start]);
                    tree.insert_before(parent, plain, Some(leaf));
                }
                let marker = tree.create_marker(&self.marker_tag, &self.marker_class, &text[range.clone()]);
                tree.insert_before(parent, marker, Some(leaf));
                summary.first_marker.get_or_insert(marker);
                summary.markers += 1;
                cursor = range.end;
            }
            if cursor < text.len() {
                let plain = tree.create_text(&text[cursor..]);
                tree.insert_before(parent, plain, Some(leaf));
            }
            tree.remove(leaf);
        }

        debug!(query, root, markers = summary.markers, "search complete");

        if let Some(first) = summary.first_marker {
            viewport.scroll_into_view(first, ScrollIntoView::smooth_center());
        }
        summary
    }

    /// Remove every marker under `root`, restoring plain merged text
    ///
    /// Returns the number of markers removed.
    pub fn clear<T: ContentTree + ?Sized>(&self, tree: &mut T, root: NodeId) -> usize {
        let markers = walker::markers(&*tree, root, &self.exclusions());
        let mut cleared = 0;

        for marker in markers {
            // A dropped marker's id can be recycled by an earlier replacement
            if !self.exclusions().is_marker(&*tree, marker) {
                continue;
            }
            let Some(parent) = tree.parent(marker) else {
                warn!(marker, "highlight marker without parent skipped");
                continue;
            };
            let text = tree.text_content(marker);
            let plain = tree.create_text(&text);
            if !tree.replace(marker, plain) {
                warn!(marker, "failed to replace highlight marker");
                tree.remove(plain);
                continue;
            }
            tree.normalize(parent);
            cleared += 1;
        }

        if cleared > 0 {
            debug!(root, cleared, "highlights cleared");
        }
        cleared
    }

    pub fn matcher_cache(&self) -> &MatcherCache {
        &self.matchers
    }
}
