// src/crawl/guard.rs
// =============================================================================
// Background memory watchdog.
//
// While a crawl runs, a small tokio task wakes up once a second and:
// - samples process memory; above the --max-memory ceiling it logs a warning
// - in streaming mode, every few seconds asks the monitor to release memory
//
// Warnings only; the crawl keeps going. Where memory can't be sampled
// there are no warnings at all.
// The task is aborted when the guard is dropped.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
// In samples: release every 5 seconds
const RELEASE_EVERY: u64 = 5;

/// Source of process memory figures.
pub trait ResourceMonitor: Send + Sync {
    /// Current memory use in megabytes, or `None` if it can't be measured.
    fn memory_usage_mb(&self) -> Option<u64>;

    /// Best-effort hint to give memory back. Does nothing by default.
    fn release_memory(&self) {}
}

/// Reads resident memory from /proc on Linux. Reports nothing elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemoryMonitor;

impl ResourceMonitor for ProcessMemoryMonitor {
    fn memory_usage_mb(&self) -> Option<u64> {
        #[cfg(target_os = "linux")]
        {
            let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
            let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
            // Page size is typically 4KB
            Some(resident_pages * 4096 / (1024 * 1024))
        }

        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

pub struct ResourceGuard {
    handle: JoinHandle<()>,
    warnings: Arc<AtomicUsize>,
}

impl ResourceGuard {
    /// Starts the watchdog, or returns `None` if there is nothing to watch
    /// (no memory ceiling and not streaming).
    pub fn spawn(
        monitor: Arc<dyn ResourceMonitor>,
        max_memory_mb: Option<u64>,
        streaming: bool,
    ) -> Option<Self> {
        if max_memory_mb.is_none() && !streaming {
            return None;
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let task_warnings = Arc::clone(&warnings);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SAMPLE_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut ticks: u64 = 0;

            loop {
                interval.tick().await;

                if let Some(limit) = max_memory_mb {
                    if let Some(used) = monitor.memory_usage_mb() {
                        if used > limit {
                            task_warnings.fetch_add(1, Ordering::Relaxed);
                            warn!(
                                "Memory limit reached ({}MB/{}MB). Consider:\n\
                                 1. Reducing concurrency (--concurrency)\n\
                                 2. Using streaming mode (-s, --stream)\n\
                                 3. Increasing memory limit (--max-memory)",
                                used, limit
                            );
                        }
                    }
                }

                if streaming && ticks % RELEASE_EVERY == 0 {
                    monitor.release_memory();
                }
                ticks += 1;
            }
        });

        Some(Self { handle, warnings })
    }

    /// How many over-limit warnings have been logged so far.
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
