// src/fetch/http.rs
// =============================================================================
// The default fetcher, built on reqwest.
//
// One Client is created per crawl and shared by every task (it is just a
// reference-counted handle, so connection pooling works across tasks).
// Redirects are followed automatically; the final URL is reported back so
// the crawler can notice when a site redirects somewhere else.
//
// The body is only read for 2xx HTML responses. Anything else comes back
// with its status and headers and an empty body.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::{FetchResponse, Fetcher};

pub const DEFAULT_USER_AGENT: &str = "Sitefetch (https://github.com/egoist/sitefetch)";

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, headers: &HeaderMap) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let mut fetched = FetchResponse {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: String::new(),
        };

        // Error pages and non-HTML bodies (PDFs, archives, images) are never
        // used, so they are never downloaded
        if fetched.status.is_success() && fetched.is_html() {
            fetched.body = response
                .text()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
        }

        Ok(fetched)
    }
}
