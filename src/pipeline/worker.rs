//! Producer and consumer worker loops.

use std::thread;
use tracing::{debug, trace};

use super::queue::{LineQueue, ProducerTally};
use super::stats::StatsCollector;
use super::table::KeywordTable;
use super::tokenize::tokenize_line;
use crate::error::PipelineError;
use crate::sources::LineSource;

/// Split the global source list round-robin across `producers` workers.
///
/// Producer `i` takes sources `i`, `i + producers`, ... in order, so a
/// source is never shared between producers and per-source line order is
/// preserved. `producers` must be non-zero.
pub fn partition_sources(sources: Vec<LineSource>, producers: usize) -> Vec<Vec<LineSource>> {
    let mut partitions: Vec<Vec<LineSource>> = (0..producers).map(|_| Vec::new()).collect();
    for (position, source) in sources.into_iter().enumerate() {
        partitions[position % producers].push(source);
    }
    partitions
}

/// Producer loop: drain every assigned source into the queue, then check in
/// with the tally.
///
/// The tally is marked exactly once on every exit path, including read
/// failures - consumers must always see the full producer count or they
/// would poll forever. The error still aborts the run.
pub fn run_producer(
    id: usize,
    sources: Vec<LineSource>,
    queue: &LineQueue,
    tally: &ProducerTally,
    stats: &StatsCollector,
) -> Result<(), PipelineError> {
    debug!("producer {id}: {} sources assigned", sources.len());
    let result = drain_sources(sources, queue, stats);
    tally.mark_finished();
    if result.is_ok() {
        debug!("producer {id}: finished");
    }
    result
}

fn drain_sources(
    sources: Vec<LineSource>,
    queue: &LineQueue,
    stats: &StatsCollector,
) -> Result<(), PipelineError> {
    for mut source in sources {
        trace!("reading `{}`", source.name());
        while let Some(line) = source.next_line()? {
            queue.enqueue(line);
            stats.increment_lines_enqueued();
        }
        stats.increment_sources_read();
    }
    Ok(())
}

/// Consumer loop: poll while producers are running, then drain the queue.
///
/// Termination needs both conditions - all producers finished and the queue
/// observed empty afterwards - so a line enqueued just before the last
/// producer checked in is never abandoned.
pub fn run_consumer(
    id: usize,
    queue: &LineQueue,
    table: &KeywordTable,
    tally: &ProducerTally,
    stats: &StatsCollector,
) {
    let mut lines = 0usize;
    while !tally.all_finished() {
        match queue.dequeue() {
            Some(line) => {
                stats.increment_lines_dequeued();
                stats.add_tokens_matched(tokenize_line(&line, table));
                lines += 1;
            }
            None => thread::yield_now(),
        }
    }
    // Drain phase: everything enqueued before the last check-in is visible
    // now, so pop until empty.
    while let Some(line) = queue.dequeue() {
        stats.increment_lines_dequeued();
        stats.add_tokens_matched(tokenize_line(&line, table));
        lines += 1;
    }
    debug!("consumer {id}: processed {lines} lines");
}
