//! Pipeline coordination: validate, start workers, wait, report.

use crossbeam::thread;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use super::queue::{LineQueue, ProducerTally};
use super::stats::{PipelineStats, StatsCollector};
use super::table::{KeywordCount, KeywordTable};
use super::worker::{partition_sources, run_consumer, run_producer};
use crate::error::PipelineError;
use crate::sources::LineSource;

/// Resolved worker counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerPlan {
    pub producers: usize,
    pub consumers: usize,
}

/// Final keyword counts (input order) plus run statistics.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub counts: Vec<KeywordCount>,
    pub stats: PipelineStats,
}

/// Run the full pipeline: validate, start every worker, wait for all of
/// them, and return the counts in input keyword order.
///
/// This is the only synchronization barrier in the system - the table is
/// not observable until this returns. Validation happens before any thread
/// starts or line is read; an empty source list is fine and yields zero
/// counts for every keyword.
pub fn run(
    plan: WorkerPlan,
    sources: Vec<LineSource>,
    keywords: Vec<String>,
    max_keywords: usize,
) -> Result<PipelineReport, PipelineError> {
    if plan.producers == 0 {
        return Err(PipelineError::Configuration(
            "producer count must be at least 1".to_string(),
        ));
    }
    if plan.consumers == 0 {
        return Err(PipelineError::Configuration(
            "consumer count must be at least 1".to_string(),
        ));
    }
    let table = KeywordTable::new(keywords, max_keywords)?;

    let queue = LineQueue::new();
    let tally = ProducerTally::new(plan.producers);
    let stats = StatsCollector::new();
    let source_count = sources.len();
    let partitions = partition_sources(sources, plan.producers);

    debug!(
        "starting {} producers and {} consumers over {} sources",
        plan.producers, plan.consumers, source_count
    );

    let started = Instant::now();
    let worker_result = thread::scope(|s| {
        let mut producers = Vec::with_capacity(plan.producers);
        for (id, assigned) in partitions.into_iter().enumerate() {
            let (queue, tally, stats) = (&queue, &tally, &stats);
            producers.push(s.spawn(move |_| run_producer(id, assigned, queue, tally, stats)));
        }
        for id in 0..plan.consumers {
            let (queue, table, tally, stats) = (&queue, &table, &tally, &stats);
            s.spawn(move |_| run_consumer(id, queue, table, tally, stats));
        }

        // Join producers explicitly to pick up the first read error;
        // consumers are joined when the scope closes.
        let mut first_error = None;
        for handle in producers {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    });
    match worker_result {
        Ok(Ok(())) => {}
        Ok(Err(error)) => return Err(error),
        Err(payload) => std::panic::resume_unwind(payload),
    }

    debug_assert!(queue.is_empty(), "consumers exited with lines still queued");
    let stats = stats.to_pipeline_stats(started.elapsed().as_millis() as u64);
    debug!(
        "pipeline complete: {} lines in {}ms",
        stats.lines_dequeued, stats.duration_ms
    );

    Ok(PipelineReport {
        counts: table.snapshot(),
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn memory_sources(entries: &[(&str, &str)]) -> Vec<LineSource> {
        entries
            .iter()
            .map(|(name, content)| LineSource::from_reader(*name, Cursor::new(content.to_string())))
            .collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn counts_of(report: &PipelineReport) -> Vec<(String, u64)> {
        report
            .counts
            .iter()
            .map(|entry| (entry.keyword.clone(), entry.count))
            .collect()
    }

    #[test]
    fn counts_a_single_source() {
        let sources = memory_sources(&[("s0", "foo bar foo\nbaz foo\n")]);
        let plan = WorkerPlan { producers: 1, consumers: 1 };
        let report = run(plan, sources, words(&["foo", "bar"]), 100).unwrap();

        assert_eq!(
            counts_of(&report),
            vec![("foo".to_string(), 3), ("bar".to_string(), 1)]
        );
        assert_eq!(report.stats.lines_enqueued, 2);
        assert_eq!(report.stats.lines_dequeued, 2);
    }

    #[test]
    fn empty_source_list_completes_with_zero_counts() {
        let plan = WorkerPlan { producers: 3, consumers: 2 };
        let report = run(plan, Vec::new(), words(&["x"]), 100).unwrap();

        assert_eq!(counts_of(&report), vec![("x".to_string(), 0)]);
        assert_eq!(report.stats.lines_enqueued, 0);
        assert_eq!(report.stats.lines_dequeued, 0);
    }

    #[test]
    fn capacity_overflow_fails_before_any_read() {
        let sources = memory_sources(&[("s0", "foo\n")]);
        let keywords: Vec<String> = (0..101).map(|i| format!("k{i}")).collect();
        let plan = WorkerPlan { producers: 1, consumers: 1 };

        let err = run(plan, sources, keywords, 100).unwrap_err();
        assert!(matches!(err, PipelineError::Capacity { count: 101, capacity: 100 }));
    }

    #[test]
    fn read_failure_aborts_the_run() {
        struct FlakyReader {
            data: Cursor<Vec<u8>>,
        }
        impl Read for FlakyReader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let read = self.data.read(buf)?;
                if read == 0 {
                    Err(std::io::Error::other("simulated read failure"))
                } else {
                    Ok(read)
                }
            }
        }

        let flaky = LineSource::from_reader(
            "flaky.txt",
            FlakyReader { data: Cursor::new(b"foo\nfoo\n".to_vec()) },
        );
        let healthy = memory_sources(&[("s0", "foo\n")]).pop().unwrap();

        let plan = WorkerPlan { producers: 2, consumers: 2 };
        let err = run(plan, vec![flaky, healthy], words(&["foo"]), 100).unwrap_err();
        match err {
            PipelineError::SourceRead { name, .. } => assert_eq!(name, "flaky.txt"),
            other => panic!("expected source read error, got {other:?}"),
        }
    }

    #[test]
    fn zero_workers_are_rejected() {
        let err = run(
            WorkerPlan { producers: 0, consumers: 1 },
            Vec::new(),
            words(&["x"]),
            100,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));

        let err = run(
            WorkerPlan { producers: 1, consumers: 0 },
            Vec::new(),
            words(&["x"]),
            100,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let err = run(
            WorkerPlan { producers: 1, consumers: 1 },
            Vec::new(),
            Vec::new(),
            100,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn counts_are_independent_of_worker_counts() {
        let corpus: Vec<(String, String)> = (0..10)
            .map(|i| {
                (
                    format!("s{i}"),
                    format!("foo bar baz\nfoo foo\nnothing here\nbar-{i} foo\n"),
                )
            })
            .collect();
        let build = || {
            corpus
                .iter()
                .map(|(name, content)| {
                    LineSource::from_reader(name.clone(), Cursor::new(content.clone()))
                })
                .collect::<Vec<_>>()
        };

        let small = run(
            WorkerPlan { producers: 1, consumers: 1 },
            build(),
            words(&["foo", "bar", "baz"]),
            100,
        )
        .unwrap();
        let large = run(
            WorkerPlan { producers: 5, consumers: 5 },
            build(),
            words(&["foo", "bar", "baz"]),
            100,
        )
        .unwrap();

        assert_eq!(counts_of(&small), counts_of(&large));
        assert_eq!(
            counts_of(&small),
            vec![
                ("foo".to_string(), 40),
                ("bar".to_string(), 10),
                ("baz".to_string(), 10),
            ]
        );
    }

    #[test]
    fn every_line_enqueued_is_dequeued_exactly_once() {
        let sources = memory_sources(&[
            ("s0", "foo\nbar\nbaz\n"),
            ("s1", "one two three\nfour\n"),
            ("s2", ""),
            ("s3", "foo foo foo"),
        ]);
        let plan = WorkerPlan { producers: 2, consumers: 3 };
        let report = run(plan, sources, words(&["foo"]), 100).unwrap();

        assert_eq!(report.stats.lines_enqueued, 6);
        assert_eq!(report.stats.lines_dequeued, 6);
        assert_eq!(report.stats.sources_read, 4);
        assert_eq!(counts_of(&report), vec![("foo".to_string(), 4)]);
    }
}
