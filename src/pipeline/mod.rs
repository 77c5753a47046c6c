//! The alert ingestion pipeline: buffer, deduplication, and the poll
//! scheduler that drives them.

mod buffer;
mod dedup;
mod scheduler;

pub use buffer::AlertBuffer;
pub use dedup::filter_new;
pub use scheduler::{AlertPipeline, PipelineHandle, PipelineStatus, PollState};
