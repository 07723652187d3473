//! Keyword table: ordered keyword list plus one atomic counter per keyword.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PipelineError;

/// One keyword and its final occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// Fixed set of distinct keywords with a counter per keyword.
///
/// Built once before workers start and never resized afterwards. Counters
/// only increase; [`record`](Self::record) is safe from any number of
/// consumer threads because each increment is a single atomic add.
#[derive(Debug)]
pub struct KeywordTable {
    keywords: Vec<String>,
    index: HashMap<String, usize>,
    counts: Vec<AtomicU64>,
}

impl KeywordTable {
    /// Validate the keyword list and build the table.
    ///
    /// Rejects an empty list and duplicates (`ConfigurationError`) and a
    /// list larger than `capacity` (`CapacityError`) - all before any
    /// worker starts.
    pub fn new(keywords: Vec<String>, capacity: usize) -> Result<Self, PipelineError> {
        if keywords.is_empty() {
            return Err(PipelineError::Configuration(
                "keyword list is empty".to_string(),
            ));
        }
        if keywords.len() > capacity {
            return Err(PipelineError::Capacity {
                count: keywords.len(),
                capacity,
            });
        }

        let mut index = HashMap::with_capacity(keywords.len());
        for (position, keyword) in keywords.iter().enumerate() {
            if index.insert(keyword.clone(), position).is_some() {
                return Err(PipelineError::Configuration(format!(
                    "duplicate keyword `{keyword}`"
                )));
            }
        }
        let counts = (0..keywords.len()).map(|_| AtomicU64::new(0)).collect();

        Ok(Self {
            keywords,
            index,
            counts,
        })
    }

    /// Record one token. Returns true if it exactly matched a keyword.
    ///
    /// Keywords are distinct, so a token increments at most one counter.
    pub fn record(&self, token: &str) -> bool {
        match self.index.get(token) {
            Some(&position) => {
                self.counts[position].fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Final counts in input keyword order. Read after all workers joined.
    pub fn snapshot(&self) -> Vec<KeywordCount> {
        self.keywords
            .iter()
            .zip(&self.counts)
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.clone(),
                count: count.load(Ordering::Relaxed),
            })
            .collect()
    }
}
