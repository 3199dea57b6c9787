//! Rendering of result sets into display blocks
//!
//! Each record becomes one block: an intro line naming the agency, the
//! linked title and an optional note for fallback search links. Blocks
//! carry no styling; emphasis and link presentation are the display
//! surface's concern.

use crate::types::ResultSet;

/// Note shown under records whose link routes to a fallback search
pub const FALLBACK_LINK_NOTE: &str = "* Note that a URL was not available for this article so \
     clicking will take you to a search on the publisher's website or relevant archive site.";

/// Human-readable name of a news agency.
///
/// Exact, case-sensitive match; unknown sources pass through unchanged.
pub fn clean_source_name(original: &str) -> &str {
    match original {
        "BBC" => "BBC News",
        "Fox" => "Fox News",
        other => other,
    }
}

/// One rendered record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBlock {
    /// Display name of the agency, emphasized in the intro line
    pub source_name: String,
    /// Visible link text
    pub title: String,
    /// Link target
    pub link: String,
    /// Fallback-search note; empty unless the link is a search link
    pub note: String,
}

impl RecordBlock {
    /// The intro line without emphasis markup.
    pub fn intro(&self) -> String {
        format!(
            "The most {0}-like article published by {0} was:",
            self.source_name
        )
    }
}

/// Map a result set to its rendered blocks, one per record, in input order.
///
/// Every call produces the full replacement content for the display area.
pub fn render(results: &ResultSet) -> Vec<RecordBlock> {
    results
        .records
        .iter()
        .map(|record| RecordBlock {
            source_name: clean_source_name(&record.source).to_string(),
            title: record.title.clone(),
            link: record.link.clone(),
            note: if record.link_will_search {
                FALLBACK_LINK_NOTE.to_string()
            } else {
                String::new()
            },
        })
        .collect()
}
