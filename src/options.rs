// src/options.rs
// =============================================================================
// Crawl configuration.
//
// `CrawlOptions` is what callers fill in. Before the crawl starts it is
// validated into `ValidatedOptions`: glob patterns are compiled, the static
// content selector is parsed, headers are checked and defaults are filled
// in. Any problem here is a `ConfigError` and no request is ever made.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use scraper::Selector;
use std::fmt;
use std::sync::Arc;

use crate::crawl::{ProcessMemoryMonitor, ResourceMonitor};
use crate::error::ConfigError;
use crate::extract::{ContentExtractor, MarkdownConverter, ReadabilityExtractor, TextConverter};
use crate::fetch::{Fetcher, DEFAULT_USER_AGENT};
use crate::matcher::PathMatcher;
use crate::page::Page;

pub const DEFAULT_CONCURRENCY: usize = 3;

/// Receives each page as soon as it is produced (streaming mode).
pub type PageSink = Box<dyn FnMut(Page) + Send>;

/// Narrows content extraction to part of the document.
#[derive(Clone)]
pub enum ContentSelector {
    /// The same CSS selector for every page
    Static(String),
    /// Picks a selector from the URL path; `None` means "whole document"
    PerPath(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>),
}

impl ContentSelector {
    pub fn per_path<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        ContentSelector::PerPath(Arc::new(f))
    }

    /// The selector to use for `path`.
    pub fn resolve(&self, path: &str) -> Option<String> {
        match self {
            ContentSelector::Static(selector) => Some(selector.clone()),
            ContentSelector::PerPath(f) => f(path),
        }
    }
}

impl fmt::Debug for ContentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSelector::Static(selector) => f.debug_tuple("Static").field(selector).finish(),
            ContentSelector::PerPath(_) => f.write_str("PerPath(..)"),
        }
    }
}

/// Everything a crawl can be told.
pub struct CrawlOptions {
    /// How many pages may be fetched at the same time
    pub concurrency: usize,
    /// Glob patterns for the paths whose content we keep. Empty keeps everything
    pub match_patterns: Vec<String>,
    pub content_selector: Option<ContentSelector>,
    /// Stop keeping pages once this many have been collected
    pub limit: Option<usize>,
    /// Warn when the process uses more memory than this
    pub max_memory_mb: Option<u64>,
    /// If set, pages are streamed here instead of being collected
    pub on_page: Option<PageSink>,
    /// Replaces the default reqwest fetcher
    pub fetcher: Option<Arc<dyn Fetcher>>,
    pub extractor: Option<Arc<dyn ContentExtractor>>,
    pub converter: Option<Arc<dyn TextConverter>>,
    pub resource_monitor: Option<Arc<dyn ResourceMonitor>>,
    /// Extra request headers, as (name, value)
    pub headers: Vec<(String, String)>,
    pub user_agent: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            match_patterns: Vec::new(),
            content_selector: None,
            limit: None,
            max_memory_mb: None,
            on_page: None,
            fetcher: None,
            extractor: None,
            converter: None,
            resource_monitor: None,
            headers: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl fmt::Debug for CrawlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlOptions")
            .field("concurrency", &self.concurrency)
            .field("match_patterns", &self.match_patterns)
            .field("content_selector", &self.content_selector)
            .field("limit", &self.limit)
            .field("max_memory_mb", &self.max_memory_mb)
            .field("streaming", &self.on_page.is_some())
            .field("headers", &self.headers)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Options after validation. Fetcher/extractor/converter are resolved by
/// the crawler since building the default HTTP client can fail for reasons
/// that have nothing to do with configuration.
pub(crate) struct ValidatedOptions {
    pub concurrency: usize,
    pub matcher: Option<PathMatcher>,
    pub content_selector: Option<ContentSelector>,
    pub limit: Option<usize>,
    pub max_memory_mb: Option<u64>,
    pub on_page: Option<PageSink>,
    pub fetcher: Option<Arc<dyn Fetcher>>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub converter: Arc<dyn TextConverter>,
    pub resource_monitor: Arc<dyn ResourceMonitor>,
    pub headers: HeaderMap,
}

impl CrawlOptions {
    pub(crate) fn validate(self) -> Result<ValidatedOptions, ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.limit == Some(0) {
            return Err(ConfigError::InvalidLimit);
        }
        if self.max_memory_mb == Some(0) {
            return Err(ConfigError::InvalidMaxMemory);
        }

        let matcher = if self.match_patterns.is_empty() {
            None
        } else {
            Some(PathMatcher::new(&self.match_patterns)?)
        };

        if let Some(ContentSelector::Static(selector)) = &self.content_selector {
            Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
                selector: selector.clone(),
                reason: format!("{:?}", e),
            })?;
        }

        let headers = build_headers(&self.user_agent, &self.headers)?;

        Ok(ValidatedOptions {
            concurrency: self.concurrency,
            matcher,
            content_selector: self.content_selector,
            limit: self.limit,
            max_memory_mb: self.max_memory_mb,
            on_page: self.on_page,
            fetcher: self.fetcher,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(ReadabilityExtractor)),
            converter: self
                .converter
                .unwrap_or_else(|| Arc::new(MarkdownConverter)),
            resource_monitor: self
                .resource_monitor
                .unwrap_or_else(|| Arc::new(ProcessMemoryMonitor)),
            headers,
        })
    }
}

// The user agent goes in first so an explicit User-Agent header wins
fn build_headers(user_agent: &str, extra: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(user_agent)
        .map_err(|_| ConfigError::InvalidHeader(format!("User-Agent: {}", user_agent)))?;
    headers.insert(USER_AGENT, user_agent);

    for (name, value) in extra {
        let invalid = || ConfigError::InvalidHeader(format!("{}: {}", name, value));
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value.trim()).map_err(|_| invalid())?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let options = CrawlOptions::default().validate().unwrap();
        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
        assert!(options.matcher.is_none());
        assert_eq!(
            options.headers.get(USER_AGENT).unwrap(),
            DEFAULT_USER_AGENT
        );
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let options = CrawlOptions {
            concurrency: 0,
            ..CrawlOptions::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidConcurrency)));

        let options = CrawlOptions {
            limit: Some(0),
            ..CrawlOptions::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidLimit)));

        let options = CrawlOptions {
            max_memory_mb: Some(0),
            ..CrawlOptions::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidMaxMemory)));
    }

    #[test]
    fn test_bad_static_selector_is_rejected() {
        let options = CrawlOptions {
            content_selector: Some(ContentSelector::Static("main >>> ??".to_string())),
            ..CrawlOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_custom_headers_override_user_agent() {
        let options = CrawlOptions {
            headers: vec![
                ("User-Agent".to_string(), "custom/1.0".to_string()),
                ("X-Token".to_string(), " abc ".to_string()),
            ],
            ..CrawlOptions::default()
        };
        let options = options.validate().unwrap();
        assert_eq!(options.headers.get(USER_AGENT).unwrap(), "custom/1.0");
        assert_eq!(options.headers.get("x-token").unwrap(), "abc");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let options = CrawlOptions {
            headers: vec![("Bad Header".to_string(), "x".to_string())],
            ..CrawlOptions::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidHeader(_))));
    }

    #[test]
    fn test_per_path_selector_resolves_by_path() {
        let selector = ContentSelector::per_path(|path| {
            path.starts_with("/docs/").then(|| "article".to_string())
        });
        assert_eq!(selector.resolve("/docs/intro"), Some("article".to_string()));
        assert_eq!(selector.resolve("/blog/post"), None);

        let selector = ContentSelector::Static("main".to_string());
        assert_eq!(selector.resolve("/anything"), Some("main".to_string()));
    }
}
