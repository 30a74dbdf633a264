// src/output.rs
// =============================================================================
// Turning pages into text or JSON.
//
// Text format (one block per page, blocks separated by a blank line):
//
//   <page>
//     <title>Getting started</title>
//     <url>https://example.com/docs</url>
//     <content>...markdown...</content>
//   </page>
//
// JSON format: an array of {"title", "url", "content"} objects.
//
// `parse_text_pages` reads the text format back. Content is written as-is,
// so a page whose content itself contains "</page>" can't be read back.
// =============================================================================

use anyhow::{anyhow, Context, Result};

use crate::crawl::CrawlSummary;
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Serializes a single page as a text block.
pub fn page_to_text(page: &Page) -> String {
    format!(
        "<page>\n  <title>{}</title>\n  <url>{}</url>\n  <content>{}</content>\n</page>",
        page.title, page.url, page.content
    )
}

/// Serializes pages in the given format.
pub fn serialize_pages<'a, I>(pages: I, format: Format) -> Result<String>
where
    I: IntoIterator<Item = &'a Page>,
{
    match format {
        Format::Json => {
            let pages: Vec<&Page> = pages.into_iter().collect();
            serde_json::to_string(&pages).context("Failed to serialize pages to JSON")
        }
        Format::Text => Ok(pages
            .into_iter()
            .map(page_to_text)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

/// Reads pages back from the text format.
pub fn parse_text_pages(text: &str) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let block_end = rest
            .find("\n</page>")
            .ok_or_else(|| anyhow!("Unterminated <page> block"))?;
        let block = rest[..block_end]
            .strip_prefix("<page>\n")
            .ok_or_else(|| anyhow!("Expected <page>"))?;

        let (title, block) = take_between(block, "  <title>", "</title>\n")?;
        let (url, block) = take_between(block, "  <url>", "</url>\n")?;
        let content = block
            .strip_prefix("  <content>")
            .and_then(|content| content.strip_suffix("</content>"))
            .ok_or_else(|| anyhow!("Malformed <content> in page {}", url))?;

        pages.push(Page {
            title: title.to_string(),
            url: url.to_string(),
            content: content.to_string(),
        });

        rest = rest[block_end + "\n</page>".len()..].trim_start();
    }

    Ok(pages)
}

// Returns the text between `open` (which must start `input`) and the first
// `close`, plus whatever follows `close`
fn take_between<'a>(input: &'a str, open: &str, close: &str) -> Result<(&'a str, &'a str)> {
    let inner = input
        .strip_prefix(open)
        .ok_or_else(|| anyhow!("Expected {}", open.trim()))?;
    let end = inner
        .find(close)
        .ok_or_else(|| anyhow!("Expected {}", close.trim()))?;
    Ok((&inner[..end], &inner[end + close.len()..]))
}

/// Formats large numbers the short way: 1.5K, 2.3M.
pub fn format_number(n: usize) -> String {
    if n > 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n > 1000 {
        format!("{:.1}K", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

/// "3 page(s), total content size: 1.5K chars". Sizes are characters of
/// markdown, not tokens.
pub fn summary_line(summary: &CrawlSummary) -> String {
    format!(
        "{} page(s), total content size: {} chars",
        summary.pages,
        format_number(summary.content_chars)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Page> {
        vec![
            Page {
                title: "Home".to_string(),
                url: "https://example.com/".to_string(),
                content: "# Welcome\n\nSome *markdown* with <b>html</b>.".to_string(),
            },
            Page {
                title: "Docs \"quoted\"".to_string(),
                url: "https://example.com/docs".to_string(),
                content: "Line one\n\n\nLine two\n".to_string(),
            },
        ]
    }

    #[test]
    fn test_text_block_layout() {
        let text = serialize_pages(&sample()[..1], Format::Text).unwrap();
        assert_eq!(
            text,
            "<page>\n  <title>Home</title>\n  <url>https://example.com/</url>\n  \
             <content># Welcome\n\nSome *markdown* with <b>html</b>.</content>\n</page>"
        );
    }

    #[test]
    fn test_text_reads_back() {
        let pages = sample();
        let text = serialize_pages(&pages, Format::Text).unwrap();
        assert!(text.contains("</page>\n\n<page>"));
        assert_eq!(parse_text_pages(&text).unwrap(), pages);
    }

    #[test]
    fn test_json_reads_back() {
        let pages = sample();
        let json = serialize_pages(&pages, Format::Json).unwrap();
        let parsed: Vec<Page> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pages);
    }

    #[test]
    fn test_empty_input() {
        let none: Vec<Page> = Vec::new();
        assert_eq!(serialize_pages(&none, Format::Json).unwrap(), "[]");
        assert_eq!(serialize_pages(&none, Format::Text).unwrap(), "");
        assert!(parse_text_pages("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_text_is_an_error() {
        assert!(parse_text_pages("<page>\n  <title>x</title>").is_err());
        assert!(parse_text_pages("<page>\n  <url>x</url>\n</page>").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1000");
        assert_eq!(format_number(1500), "1.5K");
        assert_eq!(format_number(2_345_678), "2.3M");
    }

    #[test]
    fn test_summary_line_reports_chars() {
        let summary = CrawlSummary {
            pages: 3,
            content_chars: 1500,
        };
        assert_eq!(
            summary_line(&summary),
            "3 page(s), total content size: 1.5K chars"
        );
    }
}
