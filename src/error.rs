use thiserror::Error;

/// Errors that abort a counting run.
///
/// Every variant is fatal: the caller never receives a partial or zeroed
/// table alongside one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A line source failed mid-read. Not retried; the whole run aborts.
    #[error("failed to read source `{name}`: {source}")]
    SourceRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The keyword list exceeds the configured table capacity.
    #[error("keyword list has {count} entries but the table capacity is {capacity}")]
    Capacity { count: usize, capacity: usize },

    /// Worker counts or the keyword list failed validation before startup.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
