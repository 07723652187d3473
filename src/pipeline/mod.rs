//! The producer/consumer counting pipeline.
//!
//! Data flows source -> producer -> queue -> consumer -> table:
//! producers drain their assigned line sources into the shared [`LineQueue`],
//! consumers pull lines back out and tokenize them against the shared
//! [`KeywordTable`]. The [`ProducerTally`] carries the termination protocol:
//! consumers keep polling until every producer has checked in, then drain
//! whatever is left in the queue and stop.
//!
//! [`coordinator::run`] is the single entry point and the only
//! synchronization barrier; nothing observes the table before it returns.

pub mod coordinator;
pub mod queue;
pub mod stats;
pub mod table;
pub mod tokenize;
pub mod worker;

pub use coordinator::{PipelineReport, WorkerPlan, run};
pub use queue::{LineQueue, ProducerTally};
pub use stats::{PipelineStats, StatsCollector};
pub use table::{KeywordCount, KeywordTable};
pub use tokenize::tokenize_line;
