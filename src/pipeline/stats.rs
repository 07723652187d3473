//! Run statistics, collected with atomics while workers are live.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Final statistics for one pipeline run.
///
/// `lines_enqueued == lines_dequeued` on every successful run: each line a
/// producer pushed was pulled and tokenized by exactly one consumer.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub sources_read: usize,
    pub lines_enqueued: usize,
    pub lines_dequeued: usize,
    pub tokens_matched: usize,
    pub duration_ms: u64,
}

/// Thread-safe statistics collector shared by all workers.
#[derive(Debug, Default)]
pub struct StatsCollector {
    sources_read: AtomicUsize,
    lines_enqueued: AtomicUsize,
    lines_dequeued: AtomicUsize,
    tokens_matched: AtomicUsize,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_sources_read(&self) {
        self.sources_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lines_enqueued(&self) {
        self.lines_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lines_dequeued(&self) {
        self.lines_dequeued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tokens_matched(&self, count: usize) {
        self.tokens_matched.fetch_add(count, Ordering::Relaxed);
    }

    /// Fold the counters into a final stats value.
    pub fn to_pipeline_stats(&self, duration_ms: u64) -> PipelineStats {
        PipelineStats {
            sources_read: self.sources_read.load(Ordering::Relaxed),
            lines_enqueued: self.lines_enqueued.load(Ordering::Relaxed),
            lines_dequeued: self.lines_dequeued.load(Ordering::Relaxed),
            tokens_matched: self.tokens_matched.load(Ordering::Relaxed),
            duration_ms,
        }
    }
}
