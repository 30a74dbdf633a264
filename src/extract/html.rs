// src/extract/html.rs
// =============================================================================
// Low-level HTML helpers used by the extraction pipeline.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Lets us detach nodes from the tree before re-serializing it
//
// Everything here is synchronous. `scraper::Html` is not Send, so a parsed
// document must never be held across an `.await`; the pipeline parses,
// extracts and drops it in one go.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

/// Elements that never contribute readable text. Removing them up front cuts
/// extraction noise and shrinks the DOM we keep in memory.
pub const NON_CONTENT_ELEMENTS: &str = "script,style,link,img,video";

/// Parses a document and detaches every non-content element from it.
pub fn parse_stripped(html: &str) -> Html {
    let mut document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(NON_CONTENT_ELEMENTS) else {
        return document;
    };

    // Collect ids first: we can't mutate the tree while iterating over it
    let doomed: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    document
}

/// Two URLs are on the same site when host and explicit port agree.
///
/// Default ports don't count, so http://example.com and
/// https://example.com are the same site.
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

/// Extracts every link on the page that stays on the page's own host.
///
/// Links are resolved against `page_url`, must be HTTP(S), and have their
/// fragment removed (`/a#intro` and `/a#usage` are the same page).
pub fn extract_same_host_links(document: &Html, page_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(page_url, href))
        .filter(|link| same_host(link, page_url))
        .collect()
}

/// Returns the text of the document's `<title>`, if it has a non-empty one.
pub fn document_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Outer HTML of the first element matching `selector`.
pub fn select_outer_html(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(|element| element.html())
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip in-page anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = match base.join(href) {
        Ok(url) => url,
        Err(e) => {
            warn!(href = %href, error = %e, "Failed to parse URL");
            return None;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
