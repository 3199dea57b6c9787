//! Data model for exemplar search results
//!
//! Mirrors the JSON envelope served by the query endpoints: an object with
//! a `records` key holding an ordered list of article records.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single article record returned by the query service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Raw agency identifier as stored by the service (e.g. "BBC")
    pub source: String,
    /// The article title
    pub title: String,
    /// URL of the article; empty when the service had no direct link
    #[serde(default)]
    pub link: String,
    /// True when `link` routes to a fallback search instead of the article
    #[serde(rename = "linkWillSearch", default)]
    pub link_will_search: bool,
    /// Model confidence score reported by the service (unused by the renderer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Ordered collection of records, wrapped in the service's envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultSet {
    pub records: Vec<Record>,
}

impl Record {
    /// Fill in a fallback search link when the service sent none.
    ///
    /// A record that already carries a link is left untouched.
    pub fn normalize(&mut self) {
        if self.link.is_empty() {
            self.link = fallback_search_link(&self.source, &self.title);
            self.link_will_search = true;
        }
    }
}

impl ResultSet {
    /// Normalize every record in place, preserving order.
    pub fn normalize(&mut self) {
        for record in &mut self.records {
            record.normalize();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build a search-engine URL for an article with no known URL.
///
/// The query is the agency name followed by the title words, '+'-joined,
/// so the link lands on a search for the article instead of a dead end.
pub fn fallback_search_link(source: &str, title: &str) -> String {
    let query_source = source.replace(' ', "+");
    let query_title = title_words(title).join("+");
    format!("https://duckduckgo.com/?q={}+{}", query_source, query_title)
}

/// Lowercased words of a title, in order, duplicates kept.
pub fn title_words(title: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let pattern = WORD.get_or_init(|| Regex::new(r"[\w'-]+").expect("word pattern is valid"));

    pattern
        .find_iter(title)
        .map(|word| word.as_str().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope() {
        let body = r#"{"records":[{"source":"BBC","title":"A","link":"http://x","linkWillSearch":false}]}"#;
        let results: ResultSet = serde_json::from_str(body).unwrap();

        assert_eq!(results.len(), 1);
        let record = &results.records[0];
        assert_eq!(record.source, "BBC");
        assert_eq!(record.title, "A");
        assert_eq!(record.link, "http://x");
        assert!(!record.link_will_search);
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let body = r#"{"records":[{"source":"NPR","title":"B","score":0.97}]}"#;
        let results: ResultSet = serde_json::from_str(body).unwrap();

        let record = &results.records[0];
        assert_eq!(record.link, "");
        assert!(!record.link_will_search);
        assert_eq!(record.score, Some(0.97));
    }

    #[test]
    fn test_title_words_lowercase_in_order() {
        let words = title_words("Don't Stop-Me Now Now");
        assert_eq!(words, vec!["don't", "stop-me", "now", "now"]);
    }

    #[test]
    fn test_fallback_search_link() {
        let link = fallback_search_link("NPR", "Title 1 A");
        assert_eq!(link, "https://duckduckgo.com/?q=NPR+title+1+a");
    }

    #[test]
    fn test_fallback_search_link_spaced_source() {
        let link = fallback_search_link("Fox News", "Hello World");
        assert_eq!(link, "https://duckduckgo.com/?q=Fox+News+hello+world");
    }

    #[test]
    fn test_normalize_fills_empty_link() {
        let mut record = Record {
            source: "NPR".to_string(),
            title: "Title".to_string(),
            link: String::new(),
            link_will_search: false,
            score: None,
        };
        record.normalize();

        assert_eq!(record.link, "https://duckduckgo.com/?q=NPR+title");
        assert!(record.link_will_search);
    }

    #[test]
    fn test_normalize_keeps_existing_link() {
        let mut record = Record {
            source: "NPR".to_string(),
            title: "Title".to_string(),
            link: "http://example.com/a".to_string(),
            link_will_search: false,
            score: None,
        };
        record.normalize();

        assert_eq!(record.link, "http://example.com/a");
        assert!(!record.link_will_search);
    }
}
