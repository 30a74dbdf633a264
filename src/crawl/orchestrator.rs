// src/crawl/orchestrator.rs
// =============================================================================
// The crawl itself.
//
// How it works:
// 1. Mark the seed's path as visited and queue it (the seed ignores --match)
// 2. Each task: stop early if the page limit is reached, otherwise fetch
// 3. Run the extraction pipeline on the response
// 4. Queue every same-host link whose path hasn't been visited yet
// 5. Keep the page (buffered) or hand it to the sink (streaming), unless the
//    limit was reached in the meantime
// 6. When the queue drains, return what we collected
//
// A failing page (network error, 404, not HTML, redirected away, nothing
// readable) is logged and skipped. It never stops the other pages.
//
// Shared state:
// - VisitedSet: check-and-mark under one lock, so a path is dispatched once
// - ResultStore: behind a mutex; the limit check and the insert happen under
//   the same lock, so we overshoot the limit by nothing
// Fetching and extraction run outside both locks.
// =============================================================================

use anyhow::Result;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::guard::ResourceGuard;
use super::queue::WorkQueue;
use super::store::{CrawlResult, ResultStore};
use super::visited::{crawl_path, VisitedSet};
use crate::error::ConfigError;
use crate::extract::{PageContext, Pipeline, SkipReason};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::matcher::PathMatcher;
use crate::options::{ContentSelector, CrawlOptions};
use crate::page::Page;

/// Crawls the site behind `seed_url` and returns its readable pages.
///
/// Configuration problems come back as a [`ConfigError`] (inside the
/// `anyhow::Error`) before anything is fetched. Problems with individual
/// pages are logged and never fail the crawl.
pub async fn fetch_site(seed_url: &str, options: CrawlOptions) -> Result<CrawlResult> {
    let seed = parse_seed(seed_url)?;
    let options = options.validate()?;

    let fetcher: Arc<dyn Fetcher> = match options.fetcher {
        Some(fetcher) => fetcher,
        None => Arc::new(HttpFetcher::new()?),
    };

    let store = ResultStore::new(options.on_page);
    let streaming = store.is_streaming();

    let crawler = Arc::new(Crawler {
        fetcher,
        pipeline: Pipeline::new(options.extractor, options.converter),
        queue: WorkQueue::new(options.concurrency),
        visited: VisitedSet::new(),
        store: Mutex::new(store),
        matcher: options.matcher,
        content_selector: options.content_selector,
        limit: options.limit,
        headers: options.headers,
    });

    let _guard = ResourceGuard::spawn(options.resource_monitor, options.max_memory_mb, streaming);

    info!(
        url = %seed,
        concurrency = crawler.queue.concurrency(),
        "Started fetching"
    );

    crawler.dispatch(seed, true);
    crawler.queue.drain().await;

    let result = crawler.store.lock().take_result();
    let summary = result.summary();
    info!(
        pages = summary.pages,
        visited = crawler.visited.count(),
        "Finished fetching"
    );

    Ok(result)
}

fn parse_seed(seed_url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSeedUrl {
        url: seed_url.to_string(),
        reason,
    };

    let url = Url::parse(seed_url).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(url)
}

struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    pipeline: Pipeline,
    queue: WorkQueue,
    visited: VisitedSet,
    store: Mutex<ResultStore>,
    matcher: Option<PathMatcher>,
    content_selector: Option<ContentSelector>,
    limit: Option<usize>,
    headers: HeaderMap,
}

impl Crawler {
    /// Queues `url` unless its path was already dispatched.
    fn dispatch(self: &Arc<Self>, url: Url, skip_match: bool) {
        if !self.visited.mark(&url) {
            return;
        }

        let crawler = Arc::clone(self);
        self.queue.submit(async move {
            crawler.process(url, skip_match).await;
        });
    }

    fn limit_reached(&self) -> bool {
        match self.limit {
            Some(limit) => self.store.lock().committed() >= limit,
            None => false,
        }
    }

    async fn process(self: Arc<Self>, url: Url, skip_match: bool) {
        if self.limit_reached() {
            debug!(url = %url, "Limit reached, skipping");
            return;
        }

        info!("Fetching {}", url);

        let response = match self.fetcher.fetch(&url, &self.headers).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, "Failed to fetch: {:#}", e);
                return;
            }
        };

        // The limit may have been hit while we were waiting on the network
        if self.limit_reached() {
            debug!(url = %url, "Limit reached, discarding response");
            return;
        }

        let path = crawl_path(&url);
        let context = PageContext {
            skip_match,
            matcher: self.matcher.as_ref(),
            content_selector: self
                .content_selector
                .as_ref()
                .and_then(|selector| selector.resolve(path)),
        };

        let extraction = self.pipeline.run(&url, &response, &context);
        drop(response);

        for link in extraction.links {
            self.dispatch(link, false);
        }

        match extraction.page {
            Ok(page) => self.commit(path, page),
            Err(reason) => log_skip(&url, &reason),
        }
    }

    fn commit(&self, path: &str, page: Page) {
        let mut store = self.store.lock();
        if let Some(limit) = self.limit {
            if store.committed() >= limit {
                debug!(path = %path, "Limit reached, dropping page");
                return;
            }
        }
        store.commit(path.to_string(), page);
    }
}

fn log_skip(url: &Url, reason: &SkipReason) {
    match reason {
        SkipReason::NotMatched => debug!(url = %url, "Skipping content: {}", reason),
        SkipReason::HttpStatus(_) => warn!("Failed to fetch {}: {}", url, reason),
        _ => warn!(url = %url, "{}", reason),
    }
}
