//! Composite scoring: normalization, pre-screen gate, and the weighted
//! rule engine that turns [`crate::models::TickerMetrics`] into a
//! [`crate::models::ScoreResult`].

pub mod engine;
pub mod norm;
pub mod prescreen;

pub use engine::ScoreEngine;
pub use norm::norm;
pub use prescreen::{early_setup_score, passes_gate, squeeze_score, Prescreen};
