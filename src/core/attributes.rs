//! Attribute Parsing
//!
//! Parses attributes from tag content. Lenient in the way browsers are:
//! unquoted values, boolean attributes and stray characters are accepted.

use super::entities::decode_text;
use super::scanner::is_whitespace;
use std::borrow::Cow;

/// A parsed attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name, ASCII-lowercased
    pub name: Cow<'a, [u8]>,
    /// Attribute value (references decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Create a new attribute, lowercasing the name only when needed
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        let name = if name.iter().any(u8::is_ascii_uppercase) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        };
        Attribute { name, value }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Duplicate names keep the first occurrence.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && (is_whitespace(input[pos]) || input[pos] == b'/') {
            pos += 1;
        }

        if pos >= input.len() {
            break;
        }

        // Attribute name runs until whitespace, '=', '/', or '>'
        let name_start = pos;
        while pos < input.len() && !is_whitespace(input[pos]) && !matches!(input[pos], b'=' | b'/' | b'>') {
            pos += 1;
        }

        if pos == name_start {
            // Stray '=' or '>'
            pos += 1;
            continue;
        }

        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            // Boolean attribute (`hidden`, `defer`)
            push_unique(&mut attrs, Attribute::new(name, Cow::Borrowed(b"")));
            continue;
        }

        pos += 1; // Skip '='

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() {
            push_unique(&mut attrs, Attribute::new(name, Cow::Borrowed(b"")));
            break;
        }

        let quote = input[pos];
        let value = if quote == b'"' || quote == b'\'' {
            pos += 1;
            let value_start = pos;
            while pos < input.len() && input[pos] != quote {
                pos += 1;
            }
            let value = decode_text(&input[value_start..pos]);
            if pos < input.len() {
                pos += 1; // Skip closing quote
            }
            value
        } else {
            let value_start = pos;
            while pos < input.len() && !is_whitespace(input[pos]) && input[pos] != b'>' {
                pos += 1;
            }
            decode_text(&input[value_start..pos])
        };

        push_unique(&mut attrs, Attribute::new(name, value));
    }

    attrs
}

fn push_unique<'a>(attrs: &mut Vec<Attribute<'a>>, attr: Attribute<'a>) {
    if !attrs.iter().any(|a| a.name == attr.name) {
        attrs.push(attr);
    }
}
