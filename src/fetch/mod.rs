// src/fetch/mod.rs
// =============================================================================
// Fetching pages over HTTP.
//
// The crawler never talks to reqwest directly. It goes through the `Fetcher`
// trait so callers can inject their own implementation (custom headers,
// caching, or an in-memory site in tests).
//
// Submodules:
// - http: the default reqwest-backed fetcher
// =============================================================================

mod http;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

pub use http::{HttpFetcher, DEFAULT_USER_AGENT};

/// What came back from one request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Final URL after following redirects
    pub url: Url,
    pub body: String,
}

impl FetchResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn is_html(&self) -> bool {
        self.content_type()
            .map(|content_type| content_type.contains("text/html"))
            .unwrap_or(false)
    }
}

/// Performs one network request for a URL.
///
/// Implementations follow redirects and report the final URL. Non-2xx
/// responses are *not* errors here; an `Err` means the request itself failed.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, headers: &HeaderMap) -> Result<FetchResponse>;
}
