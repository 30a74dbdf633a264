// src/crawl/visited.rs
// =============================================================================
// The set of paths that have already been dispatched.
//
// The key is the URL *path* only: scheme, host, query string and fragment
// are ignored. So /search?q=a and /search?q=b are the same page as far as
// the crawl is concerned.
//
// `mark` checks and inserts under one lock. When two pages discover the
// same link at the same moment, exactly one of them gets `true` back and
// dispatches it.
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashSet;
use url::Url;

/// The deduplication key of a URL.
pub fn crawl_path(url: &Url) -> &str {
    url.path()
}

#[derive(Debug, Default)]
pub struct VisitedSet {
    paths: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the URL's path as dispatched. Returns `false` if it already was.
    pub fn mark(&self, url: &Url) -> bool {
        let path = crawl_path(url);
        let mut paths = self.paths.lock();
        if paths.contains(path) {
            return false;
        }
        paths.insert(path.to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.paths.lock().contains(crawl_path(url))
    }

    /// Number of distinct paths dispatched so far.
    pub fn count(&self) -> usize {
        self.paths.lock().len()
    }
}
