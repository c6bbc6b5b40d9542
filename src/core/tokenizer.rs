//! Markup Tokenizer - pull-style token extraction
//!
//! Implements a pull-parser style tokenizer that extracts:
//! - Element start/end tags
//! - Text content (references decoded)
//! - Raw text content of `script` / `style`
//! - Comments
//! - DOCTYPE and other `<!...>` / `<?...>` declarations

use super::scanner::Scanner;
use std::borrow::Cow;

/// Elements whose content is raw text up to the matching end tag
pub const RAW_TEXT_ELEMENTS: &[&[u8]] = &[b"script", b"style"];

/// Elements that never have content or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[inline]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

#[inline]
pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name.as_bytes())
}

/// Type of markup token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Self-closing tag: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// Comment: <!--...-->
    Comment,
    /// DOCTYPE or other declaration
    DocType,
    /// End of file
    Eof,
}

/// A parsed markup token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name, ASCII-lowercased
    pub name: Option<Cow<'a, [u8]>>,
    /// For text/comments: the content (owned if references were decoded)
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(if name.iter().any(u8::is_ascii_uppercase) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        });
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// Error type for strict mode validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Markup tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    /// Set once Eof has been returned
    done: bool,
    strict: bool,
    error: Option<ParseError>,
    /// Name of the raw text element we are inside of
    raw_text: Option<&'static [u8]>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            done: false,
            strict: false,
            error: None,
            raw_text: None,
        }
    }

    /// Create a new tokenizer in strict mode
    pub fn new_strict(input: &'a [u8]) -> Self {
        Tokenizer {
            strict: true,
            ..Tokenizer::new(input)
        }
    }

    /// Get any parse error (strict mode only)
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Set an error if in strict mode
    fn set_error(&mut self, message: impl Into<String>, position: usize) {
        if self.strict && self.error.is_none() {
            self.error = Some(ParseError::new(message, position));
        }
    }

    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token, or None once Eof has been returned
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }

        if let Some(name) = self.raw_text.take() {
            if let Some(token) = self.parse_raw_text(name) {
                return Some(token);
            }
        }

        if self.scanner.is_eof() {
            self.done = true;
            let end = self.scanner.position();
            return Some(Token::new(TokenKind::Eof, (end, end)));
        }

        if self.scanner.peek() == Some(b'<') {
            if let Some(token) = self.parse_markup() {
                return Some(token);
            }
        }

        self.parse_text()
    }

    /// Parse markup starting with '<'. Returns None (scanner untouched) when
    /// the '<' does not start markup and must be read as text.
    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        let token = match self.scanner.peek_at(1) {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_declaration(start),
            Some(b) if b.is_ascii_alphabetic() => self.parse_start_tag(start),
            _ => None,
        };

        if token.is_none() {
            self.scanner.set_position(start);
        }
        token
    }

    /// Parse a start tag or self-closing tag
    fn parse_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '<'
        let name = self.scanner.read_name()?;

        let Some(end) = self.scanner.find_tag_end_quoted() else {
            self.set_error("Unterminated start tag", start);
            return None;
        };

        let is_empty = self.scanner.slice(start, end).ends_with(b"/");

        self.scanner.set_position(end + 1);

        let token = Token::new(
            if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag },
            (start, end + 1),
        )
        .with_name(name);

        if !is_empty {
            let lowered = token.name.as_deref().unwrap_or_default();
            self.raw_text = RAW_TEXT_ELEMENTS.iter().copied().find(|raw| *raw == lowered);
        }

        Some(token)
    }

    /// Parse an end tag
    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '</'

        let Some(name) = self.scanner.read_name() else {
            // `</>` and `</ 3>` are swallowed as bogus markup
            let end = self.scanner.find_tag_end()?;
            self.set_error("Invalid end tag name", start);
            self.scanner.set_position(end + 1);
            return Some(Token::new(TokenKind::Comment, (start, end + 1))
                .with_content(Cow::Borrowed(self.scanner.slice(start + 2, end))));
        };

        let Some(end) = self.scanner.find_tag_end() else {
            self.set_error("Unterminated end tag", start);
            return None;
        };

        self.scanner.set_position(end + 1);

        Some(Token::new(TokenKind::EndTag, (start, end + 1)).with_name(name))
    }

    /// Parse markup starting with '<!' (comment, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '<!'

        if self.scanner.starts_with(b"--") {
            return self.parse_comment(start);
        }
        self.parse_declaration(start)
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '--'
        let content_start = self.scanner.position();

        loop {
            let Some(pos) = self.scanner.find_byte(b'-') else {
                // Unterminated comment runs to the end of input
                self.set_error("Unterminated comment", start);
                let end = self.scanner.len();
                self.scanner.set_position(end);
                return Some(Token::new(TokenKind::Comment, (start, end))
                    .with_content(Cow::Borrowed(self.scanner.slice(content_start, end))));
            };
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"-->") {
                let content = self.scanner.slice(content_start, pos);
                self.scanner.advance(3); // Skip '-->'
                return Some(Token::new(TokenKind::Comment, (start, self.scanner.position()))
                    .with_content(Cow::Borrowed(content)));
            }
            self.scanner.advance(1);
        }
    }

    /// Parse `<!DOCTYPE ...>` or any other `<!...>` / `<?...>` construct
    fn parse_declaration(&mut self, start: usize) -> Option<Token<'a>> {
        let Some(end) = self.scanner.find_tag_end() else {
            self.set_error("Unterminated declaration", start);
            return None;
        };

        let is_doctype = {
            self.scanner.set_position(start + 2);
            self.scanner.starts_with_ignore_case(b"DOCTYPE")
        };

        self.scanner.set_position(end + 1);

        let content = Cow::Borrowed(self.scanner.slice(start + 2, end));
        let kind = if is_doctype { TokenKind::DocType } else { TokenKind::Comment };
        Some(Token::new(kind, (start, end + 1)).with_content(content))
    }

    /// Parse the raw content of a `script` / `style` element
    fn parse_raw_text(&mut self, name: &[u8]) -> Option<Token<'a>> {
        let start = self.scanner.position();

        let end = match self.scanner.find_raw_text_end(name) {
            Some(end) => end,
            None => {
                self.set_error("Unclosed raw text element", start);
                self.scanner.len()
            }
        };

        self.scanner.set_position(end);

        if end == start {
            return None;
        }
        Some(Token::new(TokenKind::Text, (start, end))
            .with_content(Cow::Borrowed(self.scanner.slice(start, end))))
    }

    /// Parse text content up to the next markup-starting '<'
    fn parse_text(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();

        // A '<' at the current position did not open markup, so it is text
        let end = if self.scanner.peek() == Some(b'<') {
            self.scanner.find_next_tag_start()
        } else {
            self.scanner.find_tag_start()
        }
        .unwrap_or(self.scanner.len());

        let content = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        Some(Token::new(TokenKind::Text, (start, end))
            .with_content(super::entities::decode_text(content)))
    }
}

/// Iterator adapter for tokenizer
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &[u8]) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_element() {
        let tokens: Vec<_> = Tokenizer::new(b"<p>hello</p>").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert_eq!(tokens[0].name.as_deref(), Some(b"p" as &[u8]));
        assert_eq!(tokens[1].content.as_deref(), Some(b"hello" as &[u8]));
        assert_eq!(tokens[2].kind, TokenKind::EndTag);
    }

    #[test]
    fn test_names_are_lowercased() {
        let tokens: Vec<_> = Tokenizer::new(b"<DIV></Div>").collect();
        assert_eq!(tokens[0].name.as_deref(), Some(b"div" as &[u8]));
        assert_eq!(tokens[1].name.as_deref(), Some(b"div" as &[u8]));
    }

    #[test]
    fn test_empty_element() {
        assert_eq!(kinds(b"<br/>"), vec![TokenKind::EmptyTag]);
    }

    #[test]
    fn test_comment() {
        let tokens: Vec<_> = Tokenizer::new(b"<p><!-- note --></p>").collect();
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].content.as_deref(), Some(b" note " as &[u8]));
    }

    #[test]
    fn test_doctype() {
        assert_eq!(kinds(b"<!doctype html><p></p>")[0], TokenKind::DocType);
    }

    #[test]
    fn test_script_is_raw_text() {
        let tokens: Vec<_> = Tokenizer::new(b"<script>if (a < b && c) {}</script>").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Text);
        assert_eq!(tokens[1].content.as_deref(), Some(b"if (a < b && c) {}" as &[u8]));
        assert_eq!(tokens[2].kind, TokenKind::EndTag);
    }

    #[test]
    fn test_stray_less_than_is_text() {
        let tokens: Vec<_> = Tokenizer::new(b"<p>1 < 2</p>").collect();
        let text: Vec<u8> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .flat_map(|t| t.content.as_deref().unwrap_or_default().to_vec())
            .collect();
        assert_eq!(text, b"1 < 2");
    }

    #[test]
    fn test_text_entities_decoded() {
        let tokens: Vec<_> = Tokenizer::new(b"a &amp; b").collect();
        assert_eq!(tokens[0].content.as_deref(), Some(b"a & b" as &[u8]));
    }

    #[test]
    fn test_element_classes() {
        assert!(is_void_element("br"));
        assert!(!is_void_element("span"));
        assert!(is_raw_text_element("style"));
        assert!(!is_raw_text_element("pre"));
    }

    #[test]
    fn test_strict_unterminated_tag() {
        let mut tokenizer = Tokenizer::new_strict(b"<p class=\"x\"");
        while tokenizer.next_token().is_some() {}
        let err = tokenizer.error().expect("error recorded");
        assert_eq!(err.message, "Unterminated start tag");
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_lenient_has_no_error() {
        let mut tokenizer = Tokenizer::new(b"<p class=\"x\"");
        while tokenizer.next_token().is_some() {}
        assert!(tokenizer.error().is_none());
    }

    #[test]
    fn test_eof_returned_once() {
        let mut tokenizer = Tokenizer::new(b"<p>x</p>");
        let kinds: Vec<_> = std::iter::from_fn(|| tokenizer.next_token()).map(|t| t.kind).collect();
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
        assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Eof).count(), 1);
        assert!(tokenizer.next_token().is_none());
    }
}
