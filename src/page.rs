// src/page.rs
// =============================================================================
// The result record of a crawl: one readable page.
// =============================================================================

use serde::{Deserialize, Serialize};

/// A page whose main content was extracted and converted to markdown.
///
/// `url` is the absolute URL the page was served from (after redirects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub url: String,
    pub content: String,
}
