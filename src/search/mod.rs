//! Search and highlight
//!
//! - `matcher`: literal, case-insensitive, leftmost non-overlapping matching
//! - `cache`: LRU of compiled matchers
//! - `walker`: text nodes eligible for matching
//! - `engine`: marker insertion and removal
//! - `viewport`: scroll requests to the host

pub mod cache;
pub mod engine;
pub mod matcher;
pub mod viewport;
pub mod walker;

pub use cache::MatcherCache;
pub use engine::{HighlightEngine, SearchSummary};
pub use matcher::Matcher;
pub use viewport::{NoopViewport, ScrollBehavior, ScrollBlock, ScrollIntoView, Viewport};
