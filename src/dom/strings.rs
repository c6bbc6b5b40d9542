//! String Interning Pool
//!
//! Deduplicated storage for element and attribute names. A page uses a few
//! dozen distinct names across thousands of nodes, so nodes carry a `u32` id
//! instead of an owned name.
//!
//! Uses hash-based lookup to avoid storing duplicate string data.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Offset and length of an interned string in the pool buffer
#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// String interning pool
///
/// Memory layout:
/// - `entries`: StringEntry for each interned string ID
/// - `data`: one buffer holding every interned string back to back
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug)]
pub struct StringPool {
    /// Entries indexed by string ID
    entries: Vec<StringEntry>,
    /// Buffer for interned strings
    data: String,
    /// Hash of string content -> list of IDs with that hash
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(64),
            data: String::with_capacity(512),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for "no string"
        pool.entries.push(StringEntry { offset: 0, len: 0 });
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up the ID of an already interned string without inserting
    pub fn lookup(&self, s: &str) -> Option<u32> {
        if s.is_empty() {
            return Some(0);
        }
        let ids = self.hash_index.get(&Self::compute_hash(s))?;
        ids.iter().copied().find(|&id| self.get_str(id) == Some(s))
    }

    /// Intern a string, returning the existing ID for duplicates
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(id) = self.lookup(s) {
            return id;
        }

        let offset = self.data.len() as u32;
        self.data.push_str(s);

        let id = self.entries.len() as u32;
        self.entries.push(StringEntry {
            offset,
            len: s.len() as u32,
        });
        self.hash_index
            .entry(Self::compute_hash(s))
            .or_default()
            .push(id);

        id
    }

    /// Get a string by ID
    pub fn get_str(&self, id: u32) -> Option<&str> {
        let entry = self.entries.get(id as usize)?;
        let start = entry.offset as usize;
        self.data.get(start..start + entry.len as usize)
    }

    /// Get the number of unique strings stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1 // Entry 0 is reserved
    }

    /// Get total bytes used for string storage
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern() {
        let mut pool = StringPool::new();
        let id = pool.intern("span");
        assert!(id > 0);
        assert_eq!(pool.get_str(id), Some("span"));
    }

    #[test]
    fn test_intern_duplicate() {
        let mut pool = StringPool::new();
        let id1 = pool.intern("class");
        let id2 = pool.intern("class");
        assert_eq!(id1, id2);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.bytes_used(), 5);
    }

    #[test]
    fn test_intern_different() {
        let mut pool = StringPool::new();
        let id1 = pool.intern("script");
        let id2 = pool.intern("style");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.intern(""), 0);
        assert_eq!(pool.get_str(0), Some(""));
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let mut pool = StringPool::new();
        assert_eq!(pool.lookup("id"), None);
        let id = pool.intern("id");
        assert_eq!(pool.lookup("id"), Some(id));
        assert_eq!(pool.len(), 2);
    }
}
