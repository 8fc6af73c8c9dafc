//! Analysis modules.
//!
//! The orchestrator sequences one analysis request; the aggregator turns
//! stored rows into dashboard statistics.

pub mod aggregator;
pub mod orchestrator;

pub use orchestrator::TrendAnalyzer;
