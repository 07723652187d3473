//! Shared work queue and producer completion tracking.

use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unbounded FIFO of lines shared by all producers and consumers.
///
/// Every line enqueued is dequeued exactly once; both operations are
/// non-blocking and safe from any number of threads. Growth is unbounded by
/// policy - producers never wait on a full queue, so memory is bounded only
/// by how far producers run ahead of consumers.
pub struct LineQueue {
    lines: SegQueue<String>,
}

impl LineQueue {
    pub fn new() -> Self {
        Self {
            lines: SegQueue::new(),
        }
    }

    /// Append a line at the tail.
    pub fn enqueue(&self, line: String) {
        self.lines.push(line);
    }

    /// Remove and return the head, or `None` without blocking.
    pub fn dequeue(&self) -> Option<String> {
        self.lines.pop()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for LineQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of producers that have finished, read by every consumer to decide
/// whether to keep polling.
pub struct ProducerTally {
    total: usize,
    finished: AtomicUsize,
}

impl ProducerTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            finished: AtomicUsize::new(0),
        }
    }

    /// Record one producer as finished. Called exactly once per producer.
    ///
    /// Release pairs with the Acquire in [`all_finished`](Self::all_finished):
    /// every line the producer enqueued is visible to a consumer that
    /// observes its completion.
    pub fn mark_finished(&self) {
        self.finished.fetch_add(1, Ordering::Release);
    }

    /// True once every producer has checked in.
    pub fn all_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire) >= self.total
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
