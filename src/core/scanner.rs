//! SIMD-accelerated markup scanning using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::memchr;

/// Scanner for markup delimiter detection
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Skip whitespace characters (space, tab, newline, carriage return, form feed)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && is_whitespace(self.input[self.pos]) {
            self.pos += 1;
        }
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find next '<' strictly after the current position
    #[inline]
    pub fn find_next_tag_start(&self) -> Option<usize> {
        let from = self.pos + 1;
        if from >= self.input.len() {
            return None;
        }
        memchr(b'<', &self.input[from..]).map(|i| from + i)
    }

    /// Find next '>' (tag end) using SIMD
    /// Note: Does not handle '>' inside quotes - use find_tag_end_quoted for that
    #[inline]
    pub fn find_tag_end(&self) -> Option<usize> {
        memchr(b'>', &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find tag end while handling quotes properly
    /// Returns the position of '>' that is not inside quotes
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut in_single_quote = false;
        let mut in_double_quote = false;

        while pos < self.input.len() {
            match self.input[pos] {
                b'"' if !in_single_quote => in_double_quote = !in_double_quote,
                b'\'' if !in_double_quote => in_single_quote = !in_single_quote,
                b'>' if !in_single_quote && !in_double_quote => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find the closing tag of a raw text element (`</script`, `</style`),
    /// comparing the name ASCII-case-insensitively.
    pub fn find_raw_text_end(&self, name: &[u8]) -> Option<usize> {
        let mut from = self.pos;
        while let Some(i) = memchr(b'<', &self.input[from..]) {
            let at = from + i;
            let rest = &self.input[at..];
            if rest.len() >= name.len() + 2
                && rest[1] == b'/'
                && rest[2..2 + name.len()].eq_ignore_ascii_case(name)
            {
                let after = rest.get(2 + name.len()).copied();
                if matches!(after, None | Some(b'>' | b'/')) || after.is_some_and(is_whitespace) {
                    return Some(at);
                }
            }
            from = at + 1;
        }
        None
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Case-insensitive variant of [`Scanner::starts_with`] for ASCII keywords
    #[inline]
    pub fn starts_with_ignore_case(&self, needle: &[u8]) -> bool {
        let rest = &self.input[self.pos..];
        rest.len() >= needle.len() && rest[..needle.len()].eq_ignore_ascii_case(needle)
    }

    /// Read a tag name (starts with an ASCII letter, continues until
    /// whitespace, '/', or '>')
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        if !self.input.get(start).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }

        self.pos += 1;
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }

        Some(&self.input[start..self.pos])
    }
}

/// Markup whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

/// Anything that does not terminate a tag name
#[inline]
fn is_name_char(b: u8) -> bool {
    !is_whitespace(b) && b != b'/' && b != b'>'
}
