// src/extract/markdown.rs
// =============================================================================
// Converts the extracted content fragment into normalized markdown text.
//
// htmd does the HTML -> Markdown work. We then normalize the result so every
// page looks the same regardless of how its HTML was indented:
// - trailing whitespace is removed from each line
// - runs of blank lines collapse into a single blank line
// - leading and trailing blank lines are dropped
// =============================================================================

use anyhow::{Context, Result};

/// Turns an HTML fragment into normalized text.
pub trait TextConverter: Send + Sync {
    fn convert(&self, html: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl TextConverter for MarkdownConverter {
    fn convert(&self, html: &str) -> Result<String> {
        let markdown = htmd::convert(html).context("Failed to convert HTML to markdown")?;
        Ok(normalize(&markdown))
    }
}

/// Normalizes whitespace in converted text.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();

        if line.is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(line);
        blank_run = 0;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_blank_lines() {
        let text = "\n\n# Title   \n\n\n\nFirst paragraph\nsame paragraph\n\n\n\nLast\n\n";
        assert_eq!(
            normalize(text),
            "# Title\n\nFirst paragraph\nsame paragraph\n\nLast"
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize("   \n\n  "), "");
    }

    #[test]
    fn test_convert_paragraphs() {
        let text = MarkdownConverter
            .convert("<div><p>First</p>\n\n\n<p>Second</p></div>")
            .unwrap();
        assert_eq!(text, "First\n\nSecond");
    }

    #[test]
    fn test_convert_keeps_links_and_emphasis() {
        let text = MarkdownConverter
            .convert(r#"<p>Read <a href="https://example.com/docs">the docs</a> <strong>now</strong></p>"#)
            .unwrap();
        assert!(text.contains("[the docs](https://example.com/docs)"));
        assert!(text.contains("**now**"));
    }
}
