//! Squeezescan signal scanner library.
//!
//! Scans a ticker universe on a schedule, scores each symbol against a set
//! of squeeze/setup heuristics, optionally asks an external advisory service
//! for a second opinion on qualifying candidates, persists the results, and
//! keeps the best scorers subscribed to a live quote stream.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod fetch;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scanner;
pub mod scoring;
pub mod services;
pub mod subscriptions;
