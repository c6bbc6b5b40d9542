//! Markup Event Types
//!
//! Event types for pull-parser style markup processing.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// Markup parsing event
#[derive(Debug, Clone)]
pub enum MarkupEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement<'a>),
    /// Self-closing element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags
    Text(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// DOCTYPE declaration
    DocType(Cow<'a, [u8]>),
    /// End of document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Element name, ASCII-lowercased
    pub name: Cow<'a, [u8]>,
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    pub fn new(name: Cow<'a, [u8]>, attributes: Vec<Attribute<'a>>) -> Self {
        StartElement { name, attributes }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get an attribute value by name as string
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }
}

/// End element event data
#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Element name, ASCII-lowercased
    pub name: Cow<'a, [u8]>,
}

impl<'a> EndElement<'a> {
    pub fn new(name: Cow<'a, [u8]>) -> Self {
        EndElement { name }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }
}

impl<'a> MarkupEvent<'a> {
    /// Check if this is a start element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, MarkupEvent::StartElement(_) | MarkupEvent::EmptyElement(_))
    }

    /// Check if this is a text event
    pub fn is_text(&self) -> bool {
        matches!(self, MarkupEvent::Text(_))
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            MarkupEvent::Text(t) => Some(t.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_element() {
        let elem = StartElement::new(Cow::Borrowed(b"div"), vec![]);
        assert_eq!(elem.name_str(), Some("div"));
        assert_eq!(elem.get_attribute_value("id"), None);
    }

    #[test]
    fn test_event_predicates() {
        let text = MarkupEvent::Text(Cow::Borrowed(b"hi"));
        assert!(text.is_text());
        assert!(!text.is_start_element());
        assert_eq!(text.as_text(), Some(b"hi" as &[u8]));
    }
}
