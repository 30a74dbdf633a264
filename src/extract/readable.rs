// src/extract/readable.rs
// =============================================================================
// Finds the "main content" of a page.
//
// The default implementation runs Mozilla's readability algorithm (via the
// `readability` crate), which scores blocks of text and keeps the article
// body while dropping navigation, sidebars and footers.
// =============================================================================

use std::io::Cursor;
use tracing::debug;
use url::Url;

/// The readable part of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// May be empty; the pipeline falls back to the document `<title>`
    pub title: String,
    pub content_html: String,
}

/// Turns raw HTML into an [`Article`], or `None` if nothing readable was found.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &Url) -> Option<Article>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityExtractor;

impl ContentExtractor for ReadabilityExtractor {
    fn extract(&self, html: &str, url: &Url) -> Option<Article> {
        let mut cursor = Cursor::new(html.as_bytes());

        match readability::extractor::extract(&mut cursor, url) {
            Ok(product) if !product.text.trim().is_empty() => Some(Article {
                title: product.title.trim().to_string(),
                content_html: product.content,
            }),
            Ok(_) => None,
            Err(e) => {
                debug!(url = %url, error = ?e, "Readability failed");
                None
            }
        }
    }
}
