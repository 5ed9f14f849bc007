mod aggregator;
mod source;

pub use aggregator::LogAggregator;
pub use source::{AgentLogSource, LogChunkStream, LogStreamSource};
