// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent crawling with a hard cap on in-flight requests
// - Same-host restriction (doesn't crawl external sites)
// - Each path is fetched at most once, even if many pages link to it
// - Optional page limit and memory warnings
// - Buffered (collect everything) or streaming (one page at a time) results
//
// Submodules:
// - queue: bounded work queue with drain detection
// - visited: the set of already-dispatched paths
// - store: buffered/streaming result handling
// - guard: background memory watchdog
// - orchestrator: `fetch_site`, which ties it all together
// =============================================================================

mod guard;
mod orchestrator;
mod queue;
mod store;
mod visited;

pub use guard::{ProcessMemoryMonitor, ResourceGuard, ResourceMonitor};
pub use orchestrator::fetch_site;
pub use queue::WorkQueue;
pub use store::{CrawlResult, CrawlSummary, PageMap};
pub use visited::{crawl_path, VisitedSet};
