//! Character Reference Decoding and Escaping
//!
//! Handles decoding of character references in text and attribute values:
//! - Named references: &lt; &gt; &amp; &quot; &apos; &nbsp; and common typography
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no references are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling character references
///
/// Returns Borrowed if no references present (zero-copy),
/// returns Owned if references were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    // Fast path: check if there are any references using SIMD
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all character references in the input
pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp_pos) = memchr(b'&', &input[pos..]) else {
            result.extend_from_slice(&input[pos..]);
            break;
        };

        result.extend_from_slice(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        // References are short; a far-away ';' belongs to something else
        let window = &input[pos..input.len().min(pos + 34)];
        match memchr(b';', window).and_then(|semi| Some((semi, decode_entity(&window[1..semi])?))) {
            Some((semi, decoded)) => {
                let mut buf = [0u8; 4];
                result.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                pos += semi + 1;
            }
            None => {
                // Unknown or unterminated reference, keep the ampersand
                result.push(b'&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single reference (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix(b"#") {
        return decode_numeric_entity(numeric);
    }

    Some(match entity {
        b"lt" => '<',
        b"gt" => '>',
        b"amp" => '&',
        b"quot" => '"',
        b"apos" => '\'',
        b"nbsp" => '\u{00A0}',
        b"copy" => '\u{00A9}',
        b"reg" => '\u{00AE}',
        b"trade" => '\u{2122}',
        b"mdash" => '\u{2014}',
        b"ndash" => '\u{2013}',
        b"lsquo" => '\u{2018}',
        b"rsquo" => '\u{2019}',
        b"ldquo" => '\u{201C}',
        b"rdquo" => '\u{201D}',
        b"hellip" => '\u{2026}',
        b"bull" => '\u{2022}',
        b"middot" => '\u{00B7}',
        b"rarr" => '\u{2192}',
        b"larr" => '\u{2190}',
        b"times" => '\u{00D7}',
        _ => return None,
    })
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    let codepoint = match entity.split_first()? {
        (b'x' | b'X', hex) => u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?,
        _ => std::str::from_utf8(entity).ok()?.parse::<u32>().ok()?,
    };

    // NUL and surrogates map to the replacement character
    match codepoint {
        0 => Some('\u{FFFD}'),
        _ => char::from_u32(codepoint).or(Some('\u{FFFD}')),
    }
}

/// Escape text content for markup output
pub fn encode_text(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'<' | b'>' | b'&')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape text for use in double-quoted attribute values
pub fn encode_attribute(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'<' | b'>' | b'&' | b'"')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
