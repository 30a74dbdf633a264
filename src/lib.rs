// src/lib.rs
// =============================================================================
// sitefetch: fetch a whole website as readable markdown.
//
// The library side holds the crawl engine so it can be embedded or tested
// without going through the CLI:
//
//   let result = sitefetch::fetch_site("https://example.com", CrawlOptions::default()).await?;
//   for page in result.into_pages().pages() { ... }
//
// Modules:
// - cli: command-line arguments
// - crawl: the concurrent crawler (queue, dedup, results, memory guard)
// - extract: per-page HTML -> markdown pipeline
// - fetch: the HTTP fetcher and its trait
// - matcher: glob filtering of paths
// - options: crawl configuration
// - output: text / JSON serialization
// =============================================================================

pub mod cli;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod matcher;
pub mod options;
pub mod output;
pub mod page;

pub use crawl::{fetch_site, CrawlResult, CrawlSummary, PageMap};
pub use error::ConfigError;
pub use options::{ContentSelector, CrawlOptions, PageSink};
pub use output::{serialize_pages, Format};
pub use page::Page;
