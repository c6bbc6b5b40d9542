//! Page search configuration

use crate::error::{Error, Result};
use crate::search::cache::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the guide page's search field and highlighter
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// `id` of the element whose text is searched
    pub root_id: String,
    /// Quiet period after the last keystroke before a search runs
    pub debounce_ms: u64,
    /// Trimmed queries with fewer characters only clear highlights
    pub min_query_chars: usize,
    pub marker_tag: String,
    pub marker_class: String,
    /// Elements whose text is never searched
    pub skip_tags: Vec<String>,
    /// Compiled matchers kept for reuse
    pub matcher_cache_capacity: usize,
}

impl Default for GuideConfig {
    fn default() -> Self {
        GuideConfig {
            root_id: "mainContent".to_string(),
            debounce_ms: 300,
            min_query_chars: 2,
            marker_tag: "span".to_string(),
            marker_class: "search-highlight".to_string(),
            skip_tags: vec!["script".to_string(), "style".to_string()],
            matcher_cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl GuideConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GuideConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.root_id.trim().is_empty(), "root_id", "must not be empty"),
            (self.marker_tag.trim().is_empty(), "marker_tag", "must not be empty"),
            (
                !self.marker_tag.bytes().all(|b| b.is_ascii_alphanumeric()),
                "marker_tag",
                "must be an ASCII element name",
            ),
            (self.marker_class.trim().is_empty(), "marker_class", "must not be empty"),
            (
                self.marker_class.contains(char::is_whitespace),
                "marker_class",
                "must be a single class name",
            ),
            (self.min_query_chars == 0, "min_query_chars", "must be at least 1"),
            (self.matcher_cache_capacity == 0, "matcher_cache_capacity", "must be at least 1"),
        ];

        match checks.into_iter().find(|(failed, _, _)| *failed) {
            Some((_, field, reason)) => Err(Error::InvalidConfig { field, reason }),
            None => Ok(()),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = GuideConfig::default();
        assert_eq!(config.root_id, "mainContent");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.skip_tags, vec!["script", "style"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GuideConfig::from_json(r#"{"debounce_ms": 150, "root_id": "content"}"#).unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.root_id, "content");
        assert_eq!(config.marker_class, "search-highlight");
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(GuideConfig::from_json("{}").unwrap(), GuideConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = GuideConfig::from_json(r#"{"min_query_chars": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "min_query_chars", .. }));

        let err = GuideConfig::from_json(r#"{"marker_class": "a b"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "marker_class", .. }));

        let err = GuideConfig::from_json(r#"{"root_id": " "}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { field: "root_id", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = GuideConfig::from_json(r#"{"debounce_ms": "soon"}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigFormat(_)));
    }
}
