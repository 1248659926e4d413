//! Domain types shared across the pipeline.

pub mod candidate;
pub mod metrics;

pub use candidate::{Advisory, AdvisoryAction, Candidate, ScoreResult};
pub use metrics::{Candle, Fundamentals, TickerMetrics};
