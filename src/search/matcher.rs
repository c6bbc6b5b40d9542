//! Literal case-insensitive matcher
//!
//! Text and query are folded character by character, the folded query is
//! searched with a `memmem` finder, and match offsets are translated back to
//! the unfolded text. Nothing in the query is interpreted, so `.` or `*` match
//! only themselves.

use memchr::memmem::Finder;
use std::ops::Range;

/// Fold one character to its single-character lowercase form, if it has one
#[inline]
fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Folded text plus, for non-ASCII input, the original byte offset of every
/// folded byte (with a trailing entry for the end of the text).
struct Folded<'a> {
    text: std::borrow::Cow<'a, str>,
    offsets: Option<Vec<usize>>,
}

impl Folded<'_> {
    #[inline]
    fn original(&self, folded_offset: usize) -> usize {
        match &self.offsets {
            Some(map) => map[folded_offset],
            None => folded_offset,
        }
    }
}

fn fold(text: &str) -> Folded<'_> {
    if text.is_ascii() {
        let text = if text.bytes().any(|b| b.is_ascii_uppercase()) {
            std::borrow::Cow::Owned(text.to_ascii_lowercase())
        } else {
            std::borrow::Cow::Borrowed(text)
        };
        return Folded { text, offsets: None };
    }

    let mut folded = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    for (i, c) in text.char_indices() {
        let f = fold_char(c);
        folded.push(f);
        offsets.extend(std::iter::repeat(i).take(f.len_utf8()));
    }
    offsets.push(text.len());

    Folded {
        text: std::borrow::Cow::Owned(folded),
        offsets: Some(offsets),
    }
}

/// A compiled matcher for one query
#[derive(Debug)]
pub struct Matcher {
    query: String,
    finder: Finder<'static>,
}

impl Matcher {
    /// Compile a matcher for the literal `query`
    pub fn new(query: &str) -> Self {
        let needle = fold(query).text.into_owned();
        Matcher {
            query: query.to_string(),
            finder: Finder::new(needle.as_bytes()).into_owned(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Byte ranges of every leftmost non-overlapping match in `text`
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        if self.finder.needle().is_empty() || text.is_empty() {
            return Vec::new();
        }

        let folded = fold(text);
        let needle_len = self.finder.needle().len();
        self.finder
            .find_iter(folded.text.as_bytes())
            .map(|start| folded.original(start)..folded.original(start + needle_len))
            .collect()
    }

    /// Whether `text` contains at least one match
    pub fn is_match(&self, text: &str) -> bool {
        !self.finder.needle().is_empty() && self.finder.find(fold(text).text.as_bytes()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn matched<'t>(query: &str, text: &'t str) -> Vec<&'t str> {
        Matcher::new(query)
            .find_all(text)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test_case("names", "Docker uses namespaces", &["names"] ; "single match")]
    #[test_case("aa", "aaaa", &["aa", "aa"] ; "non overlapping")]
    #[test_case("aa", "aaa", &["aa"] ; "leftmost first")]
    #[test_case("a.b", "axb a.b", &["a.b"] ; "dot is literal")]
    #[test_case("(x)*", "(x)* and xx", &["(x)*"] ; "metacharacters are literal")]
    #[test_case("docker", "DOCKER and Docker", &["DOCKER", "Docker"] ; "case preserved")]
    #[test_case("KUBE", "kubectl", &["kube"] ; "uppercase query")]
    #[test_case("zzz", "no match here", &[] ; "no match")]
    fn test_find_all(query: &str, text: &str, expected: &[&str]) {
        assert_eq!(matched(query, text), expected);
    }

    #[test]
    fn test_non_ascii_offsets() {
        let text = "Größe und GRÖSSE";
        assert_eq!(matched("größe", text), vec!["Größe"]);
        assert_eq!(matched("ÖS", text), vec!["ÖS"]);
    }

    #[test]
    fn test_multi_char_lowercase_kept() {
        // U+0130 lowercases to two characters and is compared as-is
        let text = "İstanbul istanbul";
        assert_eq!(matched("istanbul", text), vec!["istanbul"]);
        assert_eq!(matched("İst", text), vec!["İst"]);
    }

    #[test]
    fn test_offsets_are_char_boundaries() {
        let text = "Ünïcödé ÜNÏCÖDÉ";
        for range in Matcher::new("ïcö").find_all(text) {
            assert!(text.is_char_boundary(range.start));
            assert!(text.is_char_boundary(range.end));
        }
        assert_eq!(matched("ïcö", text).len(), 2);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let m = Matcher::new("");
        assert!(m.find_all("anything").is_empty());
        assert!(!m.is_match("anything"));
    }

    #[test]
    fn test_is_match() {
        let m = Matcher::new("Cgroups");
        assert!(m.is_match("namespaces and cgroups"));
        assert!(!m.is_match("namespaces"));
        assert_eq!(m.query(), "Cgroups");
    }
}
