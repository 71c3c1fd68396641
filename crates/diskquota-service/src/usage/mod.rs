//! Usage aggregation over the asset inventory.

pub mod aggregator;

pub use aggregator::{Usage, UsageAggregator};
