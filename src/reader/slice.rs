//! Zero-Copy Slice Reader
//!
//! Parses markup from a byte slice with zero-copy semantics.
//! Input references are maintained directly in the output.

use super::events::{EndElement, MarkupEvent, StartElement};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::scanner::is_whitespace;
use crate::core::tokenizer::{ParseError, Token, TokenKind, Tokenizer};

/// Zero-copy markup reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Create a new slice reader in strict mode
    pub fn new_strict(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new_strict(input),
        }
    }

    /// Get parse error (strict mode only)
    pub fn error(&self) -> Option<&ParseError> {
        self.tokenizer.error()
    }

    /// Byte offset of the reader in the input
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }

    /// Get the next markup event
    pub fn next_event(&mut self) -> Option<MarkupEvent<'a>> {
        loop {
            let token = self.tokenizer.next_token()?;

            match token.kind {
                TokenKind::Eof => return Some(MarkupEvent::EndDocument),

                TokenKind::StartTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = token.name?;
                    return Some(MarkupEvent::StartElement(StartElement::new(name, attrs)));
                }

                TokenKind::EmptyTag => {
                    let attrs = self.parse_tag_attributes(&token);
                    let name = token.name?;
                    return Some(MarkupEvent::EmptyElement(StartElement::new(name, attrs)));
                }

                TokenKind::EndTag => {
                    let name = token.name?;
                    return Some(MarkupEvent::EndElement(EndElement::new(name)));
                }

                TokenKind::Text => {
                    if let Some(content) = token.content {
                        if !content.is_empty() {
                            return Some(MarkupEvent::Text(content));
                        }
                    }
                }

                TokenKind::Comment => {
                    if let Some(content) = token.content {
                        return Some(MarkupEvent::Comment(content));
                    }
                }

                TokenKind::DocType => {
                    if let Some(content) = token.content {
                        return Some(MarkupEvent::DocType(content));
                    }
                }
            }
        }
    }

    /// Parse attributes from a tag token
    fn parse_tag_attributes(&self, token: &Token<'a>) -> Vec<Attribute<'a>> {
        let (start, end) = token.span;
        let tag_content = &self.input[start..end];

        // Skip '<' and the tag name
        let mut pos = 1;
        while pos < tag_content.len() {
            let b = tag_content[pos];
            if is_whitespace(b) || b == b'>' || b == b'/' {
                break;
            }
            pos += 1;
        }

        // Find end of attributes (before '>' or '/>')
        let mut attr_end = tag_content.len();
        if tag_content.ends_with(b"/>") {
            attr_end -= 2;
        } else if tag_content.ends_with(b">") {
            attr_end -= 1;
        }

        if pos >= attr_end {
            return Vec::new();
        }

        parse_attributes(&tag_content[pos..attr_end])
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.next_event()?;
        if matches!(event, MarkupEvent::EndDocument) {
            None
        } else {
            Some(event)
        }
    }
}

/// Parse markup from a byte slice and return all events
pub fn parse_events(input: &[u8]) -> Vec<MarkupEvent<'_>> {
    SliceReader::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events = parse_events(b"<p>hello</p>");
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name_str() == Some("p")));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], MarkupEvent::EndElement(e) if e.name_str() == Some("p")));
    }

    #[test]
    fn test_empty_element() {
        let events = parse_events(b"<br/>");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], MarkupEvent::EmptyElement(e) if e.name_str() == Some("br")));
    }

    #[test]
    fn test_attributes() {
        let events = parse_events(b"<main id=\"mainContent\" class=\"content\">");
        assert_eq!(events.len(), 1);

        if let MarkupEvent::StartElement(e) = &events[0] {
            assert_eq!(e.get_attribute_value("id"), Some("mainContent"));
            assert_eq!(e.get_attribute_value("class"), Some("content"));
        } else {
            panic!("Expected StartElement");
        }
    }

    #[test]
    fn test_self_closing_attributes() {
        let events = parse_events(b"<input type=\"search\" id=\"searchInput\"/>");
        if let MarkupEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.get_attribute_value("type"), Some("search"));
            assert_eq!(e.get_attribute_value("id"), Some("searchInput"));
        } else {
            panic!("Expected EmptyElement");
        }
    }

    #[test]
    fn test_comment_and_doctype() {
        let events = parse_events(b"<!DOCTYPE html><p><!-- c --></p>");
        assert!(matches!(&events[0], MarkupEvent::DocType(_)));
        assert!(events.iter().any(|e| matches!(e, MarkupEvent::Comment(_))));
    }

    #[test]
    fn test_nested() {
        let events = parse_events(b"<a><b>text</b></a>");
        assert_eq!(events.len(), 5);
    }
}
