//! RustyMark - In-page search and highlight for documentation pages
//!
//! Layers:
//! A: Markup scanning and tokenizing (core)
//! B: Pull reader producing markup events (reader)
//! C: Mutable arena DOM with serialisation (dom)
//! D: Literal case-insensitive search and highlight markers (search)
//! E: Debounced search-field controller for the guide page (guide)
//!
//! ```no_run
//! use rustymark::{GuideConfig, GuideEvent, GuideSearch, NoopViewport};
//! use std::time::Instant;
//!
//! let page = std::fs::read_to_string("index.html")?;
//! let mut guide = GuideSearch::new(&page, GuideConfig::default())?;
//!
//! guide.handle(Instant::now(), GuideEvent::Input("namespaces".into()));
//! if let Some(due) = guide.next_deadline() {
//!     guide.tick(due, &mut NoopViewport);
//! }
//! println!("{}", guide.render());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod guide;
pub mod reader;
pub mod search;

pub use config::GuideConfig;
pub use debounce::Debouncer;
pub use dom::{ContentTree, Document, NodeId, NodeKind};
pub use error::{Error, Result};
pub use guide::{GuideEvent, GuideSearch, Key, KeyPress, KeyTarget, Modifiers, Outcome};
pub use search::{HighlightEngine, NoopViewport, ScrollIntoView, SearchSummary, Viewport};
