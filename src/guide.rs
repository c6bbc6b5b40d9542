//! Guide page search controller
//!
//! Owns the page document and wires the search field to the highlight engine:
//! keystrokes in the field are debounced, Escape resets everything and
//! Ctrl/Cmd+F or Ctrl/Cmd+K jump to the field. The host feeds events through
//! [`GuideSearch::handle`] and calls [`GuideSearch::tick`] when the timer set
//! from [`GuideSearch::next_deadline`] fires.

use crate::config::GuideConfig;
use crate::debounce::Debouncer;
use crate::dom::{outer_markup, Document, NodeId};
use crate::error::{Error, Result};
use crate::search::{HighlightEngine, SearchSummary, Viewport};
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// A printable key as reported by the host (`"f"`, `"K"`, ...)
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Where a key-down event was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    SearchField,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
    pub target: KeyTarget,
}

impl KeyPress {
    pub fn new(key: Key, target: KeyTarget) -> Self {
        KeyPress {
            key,
            modifiers: Modifiers::default(),
            target,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideEvent {
    /// The search field's value changed
    Input(String),
    KeyDown(KeyPress),
}

/// What the host should do with the native event afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Handled,
    /// Handled; the browser's default action must be suppressed
    PreventDefault,
}

/// State of the search input element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchField {
    pub value: String,
    pub focused: bool,
}

pub struct GuideSearch {
    document: Document,
    root: NodeId,
    config: GuideConfig,
    engine: HighlightEngine,
    debouncer: Debouncer<String>,
    field: SearchField,
}

impl GuideSearch {
    /// Load page markup and locate the content root
    pub fn new(markup: &str, config: GuideConfig) -> Result<Self> {
        Self::from_document(Document::parse(markup), config)
    }

    pub fn from_document(document: Document, config: GuideConfig) -> Result<Self> {
        let engine = HighlightEngine::new(&config)?;
        let root = document
            .element_by_id(&config.root_id)
            .ok_or_else(|| Error::RootNotFound {
                id: config.root_id.clone(),
            })?;

        debug!(root_id = %config.root_id, nodes = document.node_count(), "guide search ready");

        Ok(GuideSearch {
            engine,
            debouncer: Debouncer::new(config.debounce()),
            document,
            root,
            config,
            field: SearchField::default(),
        })
    }

    /// Apply one inbound event
    pub fn handle(&mut self, now: Instant, event: GuideEvent) -> Outcome {
        match event {
            GuideEvent::Input(value) => {
                let query = value.trim().to_string();
                self.field.value = value;
                if let Some(superseded) = self.debouncer.schedule(now, query) {
                    trace!(superseded = %superseded, "pending search superseded");
                }
                Outcome::Handled
            }
            GuideEvent::KeyDown(press) => self.handle_key(press),
        }
    }

    fn handle_key(&mut self, press: KeyPress) -> Outcome {
        match press.key {
            Key::Escape if press.target == KeyTarget::SearchField => {
                self.field.value.clear();
                self.engine.clear(&mut self.document, self.root);
                self.debouncer.cancel();
                self.field.focused = false;
                debug!("search reset");
                Outcome::Handled
            }
            Key::Char('f' | 'k') if press.modifiers.ctrl || press.modifiers.meta => {
                self.field.focused = true;
                debug!(key = ?press.key, "search shortcut");
                Outcome::PreventDefault
            }
            _ => Outcome::Ignored,
        }
    }

    /// Run the debounced search if it is due
    pub fn tick<V: Viewport + ?Sized>(&mut self, now: Instant, viewport: &mut V) -> Option<SearchSummary> {
        let query = self.debouncer.poll(now)?;
        debug!(query = %query, "debounced search firing");
        Some(self.engine.search(&mut self.document, self.root, &query, viewport))
    }

    /// Search immediately, bypassing the debouncer
    pub fn search_now<V: Viewport + ?Sized>(&mut self, query: &str, viewport: &mut V) -> SearchSummary {
        self.debouncer.cancel();
        self.engine.search(&mut self.document, self.root, query, viewport)
    }

    pub fn clear(&mut self) -> usize {
        self.engine.clear(&mut self.document, self.root)
    }

    /// When the host should next call [`tick`](Self::tick)
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn field(&self) -> &SearchField {
        &self.field
    }

    /// Current markup of the content root
    pub fn render(&self) -> String {
        outer_markup(&self.document, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::NoopViewport;
    use std::time::Duration;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><style>.search-highlight { background: yellow }</style></head>
<body>
<input type="search" id="searchInput" placeholder="Search">
<main id="mainContent">
<section class="content-section"><h2>Containers</h2>
<p>Docker uses namespaces and cgroups to isolate containers.</p>
<script>const docker = true;</script>
</section>
</main>
</body></html>"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn guide() -> GuideSearch {
        GuideSearch::new(PAGE, GuideConfig::default()).unwrap()
    }

    fn marker_count(guide: &GuideSearch) -> usize {
        guide
            .document()
            .elements_with_class(guide.root(), "search-highlight")
            .len()
    }

    fn type_text(guide: &mut GuideSearch, start: Instant, text: &str) -> Instant {
        let mut now = start;
        for end in 1..=text.len() {
            guide.handle(now, GuideEvent::Input(text[..end].to_string()));
            now += ms(50);
        }
        now
    }

    #[test]
    fn test_missing_root() {
        let err = GuideSearch::new("<main id=\"other\"></main>", GuideConfig::default()).err().unwrap();
        assert!(matches!(err, Error::RootNotFound { ref id } if id == "mainContent"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GuideConfig {
            min_query_chars: 0,
            ..GuideConfig::default()
        };
        assert!(matches!(GuideSearch::new(PAGE, config), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_typing_debounces_to_last_value() {
        let mut guide = guide();
        let start = Instant::now();
        let end = type_text(&mut guide, start, "docker");

        // Nothing runs while keys keep arriving
        assert_eq!(guide.tick(end - ms(50), &mut NoopViewport), None);
        assert_eq!(marker_count(&guide), 0);

        let due = guide.next_deadline().unwrap();
        assert_eq!(due, end - ms(50) + ms(300));
        let summary = guide.tick(due, &mut NoopViewport).unwrap();
        assert_eq!(summary.markers, 1);
        assert_eq!(guide.next_deadline(), None);
        assert_eq!(guide.tick(due + ms(1000), &mut NoopViewport), None);
    }

    #[test]
    fn test_script_content_not_highlighted() {
        let mut guide = guide();
        guide.search_now("docker", &mut NoopViewport);
        assert!(guide.render().contains("<script>const docker = true;</script>"));
        assert!(guide.render().contains("<span class=\"search-highlight\">Docker</span> uses"));
    }

    #[test]
    fn test_short_input_clears() {
        let mut guide = guide();
        let start = Instant::now();
        guide.search_now("cgroups", &mut NoopViewport);
        assert_eq!(marker_count(&guide), 1);

        guide.handle(start, GuideEvent::Input(" c ".to_string()));
        let summary = guide.tick(start + ms(300), &mut NoopViewport).unwrap();
        assert_eq!(summary.markers, 0);
        assert_eq!(marker_count(&guide), 0);
    }

    #[test]
    fn test_escape_resets_field() {
        let mut guide = guide();
        let start = Instant::now();
        guide.search_now("namespaces", &mut NoopViewport);
        let shortcut = KeyPress::new(Key::Char('k'), KeyTarget::Page).with_modifiers(Modifiers {
            ctrl: true,
            ..Modifiers::default()
        });
        guide.handle(start, GuideEvent::KeyDown(shortcut));
        guide.handle(start, GuideEvent::Input("isolate".to_string()));
        assert!(guide.field().focused);

        let outcome = guide.handle(
            start + ms(10),
            GuideEvent::KeyDown(KeyPress::new(Key::Escape, KeyTarget::SearchField)),
        );

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(guide.field(), &SearchField::default());
        assert_eq!(marker_count(&guide), 0);
        assert_eq!(guide.next_deadline(), None);
        assert_eq!(guide.tick(start + ms(1000), &mut NoopViewport), None);
    }

    #[test]
    fn test_escape_outside_field_ignored() {
        let mut guide = guide();
        guide.search_now("docker", &mut NoopViewport);
        let outcome = guide.handle(
            Instant::now(),
            GuideEvent::KeyDown(KeyPress::new(Key::Escape, KeyTarget::Page)),
        );
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(marker_count(&guide), 1);
    }

    #[test]
    fn test_focus_shortcuts() {
        for (key, modifiers, expected) in [
            ('f', Modifiers { ctrl: true, ..Default::default() }, Outcome::PreventDefault),
            ('k', Modifiers { meta: true, ..Default::default() }, Outcome::PreventDefault),
            ('f', Modifiers::default(), Outcome::Ignored),
            ('g', Modifiers { ctrl: true, ..Default::default() }, Outcome::Ignored),
        ] {
            let mut guide = guide();
            let press = KeyPress::new(Key::Char(key), KeyTarget::Page).with_modifiers(modifiers);
            assert_eq!(guide.handle(Instant::now(), GuideEvent::KeyDown(press)), expected);
            assert_eq!(guide.field().focused, expected == Outcome::PreventDefault);
        }
    }

    #[test]
    fn test_input_keeps_raw_value() {
        let mut guide = guide();
        guide.handle(Instant::now(), GuideEvent::Input("  docker ".to_string()));
        assert_eq!(guide.field().value, "  docker ");
        assert_eq!(guide.clear(), 0);
        assert_eq!(guide.config().debounce_ms, 300);
    }
}
