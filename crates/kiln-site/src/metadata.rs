//! Leading `key: value` metadata headers.
//!
//! A page may open with a block of metadata lines:
//!
//! ```text
//! title: Hello
//! author: Jane
//!
//! <h1>{{ title }}</h1>
//! ```
//!
//! [`extract`] consumes those lines and returns the mapping together with the
//! remaining body. Empty lines inside the header are skipped; the first
//! non-empty line without the split character ends the header and is kept as
//! the first line of the body. A line holding only whitespace is not empty.

use std::collections::HashMap;

/// Default separator between metadata keys and values.
pub const DEFAULT_SPLIT_CHAR: char = ':';

/// Metadata mapping extracted from a page header.
pub type Metadata = HashMap<String, String>;

/// Result of metadata extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Parsed header values (keys and values trimmed).
    pub metadata: Metadata,
    /// Body with the header lines removed.
    pub body: String,
}

/// Split a content buffer into its metadata header and remaining body.
///
/// Duplicate keys keep the last value. If every line belongs to the header,
/// the remaining body is empty.
#[must_use]
pub fn extract(content: &str, split_char: char) -> Extracted {
    let lines: Vec<&str> = content.lines().collect();
    let mut metadata = Metadata::new();
    let mut body_start = lines.len();

    for (index, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(split_char) else {
            body_start = index;
            break;
        };
        metadata.insert(key.trim().to_owned(), value.trim().to_owned());
    }

    Extracted {
        metadata,
        body: lines[body_start..].join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_extract_header_and_body() {
        let result = extract("a: 1\nb: 2\n\ncontent", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("a", "1"), ("b", "2")]));
        assert_eq!(result.body, "content");
    }

    #[test]
    fn test_extract_empty_body() {
        let result = extract("", DEFAULT_SPLIT_CHAR);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_extract_no_header() {
        let result = extract("<h1>Hello</h1>\n<p>World</p>", DEFAULT_SPLIT_CHAR);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "<h1>Hello</h1>\n<p>World</p>");
    }

    #[test]
    fn test_extract_header_only() {
        let result = extract("title: Home\nauthor: Jane\n", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("title", "Home"), ("author", "Jane")]));
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_extract_blank_lines_only() {
        let result = extract("\n\n\n", DEFAULT_SPLIT_CHAR);
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_extract_whitespace_line_ends_header() {
        let result = extract("a: 1\n   \nb: 2\n<p>x</p>", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("a", "1")]));
        assert_eq!(result.body, "   \nb: 2\n<p>x</p>");
    }

    #[test]
    fn test_extract_leading_blank_lines_skipped() {
        let result = extract("\n\ntitle: Home\n\n<p>x</p>", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("title", "Home")]));
        assert_eq!(result.body, "<p>x</p>");
    }

    #[test]
    fn test_extract_value_keeps_later_separators() {
        let result = extract("url: https://example.com:8080/x\nbody", DEFAULT_SPLIT_CHAR);
        assert_eq!(
            result.metadata,
            meta(&[("url", "https://example.com:8080/x")])
        );
        assert_eq!(result.body, "body");
    }

    #[test]
    fn test_extract_trims_keys_and_values() {
        let result = extract("  title  :   Spaced Out  \nbody", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("title", "Spaced Out")]));
    }

    #[test]
    fn test_extract_duplicate_key_last_wins() {
        let result = extract("tag: one\ntag: two\nbody", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("tag", "two")]));
    }

    #[test]
    fn test_extract_keys_case_sensitive() {
        let result = extract("Title: A\ntitle: B\nbody", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("Title", "A"), ("title", "B")]));
    }

    #[test]
    fn test_extract_terminator_line_retained_verbatim() {
        let result = extract("a: 1\n  <div>\n\nb: 2", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("a", "1")]));
        assert_eq!(result.body, "  <div>\n\nb: 2");
    }

    #[test]
    fn test_extract_custom_split_char() {
        let result = extract("title = Home\nx: y\nbody", '=');
        assert_eq!(result.metadata, meta(&[("title", "Home")]));
        assert_eq!(result.body, "x: y\nbody");
    }

    #[test]
    fn test_extract_crlf_lines() {
        let result = extract("a: 1\r\n\r\ncontent\r\nmore", DEFAULT_SPLIT_CHAR);
        assert_eq!(result.metadata, meta(&[("a", "1")]));
        assert_eq!(result.body, "content\nmore");
    }
}
