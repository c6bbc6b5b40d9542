//! Compiled matcher cache
//!
//! Typing moves back and forth over the same prefixes, so recently compiled
//! matchers are kept in an LRU keyed by the query text.

use super::matcher::Matcher;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::rc::Rc;

pub const DEFAULT_CAPACITY: usize = 32;

pub struct MatcherCache {
    cache: LruCache<String, Rc<Matcher>>,
}

impl Default for MatcherCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MatcherCache {
    /// Create a cache holding up to `capacity` matchers (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MatcherCache {
            cache: LruCache::new(capacity),
        }
    }

    /// Get the matcher for `query`, compiling it on a miss
    pub fn get(&mut self, query: &str) -> Rc<Matcher> {
        if let Some(matcher) = self.cache.get(query) {
            tracing::trace!(query, "matcher cache hit");
            return Rc::clone(matcher);
        }

        let matcher = Rc::new(Matcher::new(query));
        self.cache.put(query.to_string(), Rc::clone(&matcher));
        matcher
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_matcher() {
        let mut cache = MatcherCache::default();
        let a = cache.get("docker");
        let b = cache.get("docker");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recent() {
        let mut cache = MatcherCache::new(2);
        let first = cache.get("one");
        cache.get("two");
        cache.get("one");
        cache.get("three");
        assert_eq!(cache.len(), 2);
        assert!(Rc::ptr_eq(&first, &cache.get("one")));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut cache = MatcherCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.get("a");
        cache.get("b");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
