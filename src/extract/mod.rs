// src/extract/mod.rs
// =============================================================================
// This module turns fetched HTML into readable pages.
//
// Submodules:
// - html: DOM helpers (stripping, link harvesting, titles, selectors)
// - readable: main-content extraction (readability)
// - markdown: HTML -> normalized markdown (htmd)
// - pipeline: the per-page sequence that ties them together
//
// `ContentExtractor` and `TextConverter` are traits so the crawler can be
// given other implementations; the defaults are `ReadabilityExtractor` and
// `MarkdownConverter`.
// =============================================================================

mod html;
mod markdown;
mod pipeline;
mod readable;

pub use html::{extract_same_host_links, parse_stripped, same_host, NON_CONTENT_ELEMENTS};
pub use markdown::{normalize, MarkdownConverter, TextConverter};
pub use pipeline::{Extraction, PageContext, Pipeline, SkipReason};
pub use readable::{Article, ContentExtractor, ReadabilityExtractor};
