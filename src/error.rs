// src/error.rs
// =============================================================================
// Configuration errors.
//
// Almost everything that can go wrong during a crawl only affects one page,
// so it gets logged and skipped (see crawl/orchestrator.rs). The exception is
// bad configuration: an invalid seed URL, a malformed glob pattern, a broken
// CSS selector or a nonsense number. Those fail the whole crawl before the
// first request goes out.
//
// We use `thiserror` here (instead of plain anyhow) so callers of the library
// can match on the exact problem.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("Invalid match pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid content selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Limit must be at least 1")]
    InvalidLimit,

    #[error("Max memory must be at least 1 MB")]
    InvalidMaxMemory,

    #[error("Invalid header '{0}'")]
    InvalidHeader(String),
}
