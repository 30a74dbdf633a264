// src/crawl/store.rs
// =============================================================================
// Where finished pages go.
//
// Two modes, picked once per crawl:
// - Buffered: pages are kept in a PageMap (path -> page, in the order they
//   finished) and handed back when the crawl ends
// - Streaming: each page is passed to the caller's sink right away and only
//   counters are kept, so memory doesn't grow with the size of the site
//
// The crawler keeps the store behind a mutex. Calling the sink while that
// lock is held means the sink never runs concurrently with itself. Other
// tasks wait on the same lock for their limit check, so a sink should be
// quick: write the page out and return.
// =============================================================================

use serde::Serialize;

use crate::options::PageSink;
use crate::page::Page;

/// Counters reported at the end of a crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages: usize,
    /// Total characters of page content
    pub content_chars: usize,
}

impl CrawlSummary {
    fn record(&mut self, page: &Page) {
        self.pages += 1;
        self.content_chars += page.content.chars().count();
    }
}

/// Pages keyed by path, in completion order.
///
/// Each path is dispatched at most once, so keys never repeat.
#[derive(Debug, Clone, Default)]
pub struct PageMap {
    entries: Vec<(String, Page)>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Page> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, page)| page)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.entries.iter().map(|(_, page)| page)
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.entries.into_iter().map(|(_, page)| page).collect()
    }

    pub fn summary(&self) -> CrawlSummary {
        let mut summary = CrawlSummary::default();
        for page in self.pages() {
            summary.record(page);
        }
        summary
    }

    // Callers guarantee `path` is new (the visited set sees to that)
    fn push(&mut self, path: String, page: Page) {
        self.entries.push((path, page));
    }
}

/// What `fetch_site` returns.
#[derive(Debug)]
pub enum CrawlResult {
    Buffered(PageMap),
    Streamed(CrawlSummary),
}

impl CrawlResult {
    pub fn summary(&self) -> CrawlSummary {
        match self {
            CrawlResult::Buffered(pages) => pages.summary(),
            CrawlResult::Streamed(summary) => *summary,
        }
    }

    /// The collected pages. Always empty for a streamed crawl.
    pub fn into_pages(self) -> PageMap {
        match self {
            CrawlResult::Buffered(pages) => pages,
            CrawlResult::Streamed(_) => PageMap::new(),
        }
    }
}

pub(crate) enum ResultStore {
    Buffered(PageMap),
    Streaming { sink: PageSink, summary: CrawlSummary },
}

impl ResultStore {
    pub fn new(sink: Option<PageSink>) -> Self {
        match sink {
            Some(sink) => ResultStore::Streaming {
                sink,
                summary: CrawlSummary::default(),
            },
            None => ResultStore::Buffered(PageMap::new()),
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, ResultStore::Streaming { .. })
    }

    /// Pages committed so far.
    pub fn committed(&self) -> usize {
        match self {
            ResultStore::Buffered(pages) => pages.len(),
            ResultStore::Streaming { summary, .. } => summary.pages,
        }
    }

    pub fn commit(&mut self, path: String, page: Page) {
        match self {
            ResultStore::Buffered(pages) => pages.push(path, page),
            ResultStore::Streaming { sink, summary } => {
                summary.record(&page);
                sink(page);
            }
        }
    }

    /// Hands the collected result out, leaving an empty store behind.
    pub fn take_result(&mut self) -> CrawlResult {
        match self {
            ResultStore::Buffered(pages) => CrawlResult::Buffered(std::mem::take(pages)),
            ResultStore::Streaming { summary, .. } => CrawlResult::Streamed(*summary),
        }
    }
}
