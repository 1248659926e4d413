//! Environment-based configuration.
//!
//! Connection strings come from individual env vars; scan tunables live in
//! [`ScanConfig`] so tests can inject them directly. Score thresholds are
//! deliberately configuration, not constants: they are empirically chosen
//! and expected to be tuned.

use serde::{Deserialize, Serialize};
use std::env;

use crate::services::market_data::UniverseFilter;

/// Deployment environment ("production" enables JSON logs).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// QuestDB Postgres-wire connection string.
pub fn get_questdb_url() -> String {
    env::var("QUESTDB_URL")
        .unwrap_or_else(|_| "host=localhost port=8812 user=admin password=quest dbname=qdb".to_string())
}

/// Base URL of the quote/history provider REST API.
pub fn get_quote_api_url() -> String {
    env::var("QUOTE_API_URL").unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string())
}

/// Base URL of the advisory (LLM) service; None disables enrichment.
pub fn get_advisory_url() -> Option<String> {
    env::var("ADVISORY_URL").ok()
}

pub fn get_advisory_api_key() -> Option<String> {
    env::var("ADVISORY_API_KEY").ok()
}

pub fn get_advisory_model() -> String {
    env::var("ADVISORY_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

/// Live quote stream websocket endpoint; None disables live subscriptions.
pub fn get_stream_url() -> Option<String> {
    env::var("STREAM_URL").ok()
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_parse_opt<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Tunable knobs for a scan cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Symbols fetched concurrently per batch.
    pub batch_size: usize,
    /// Pause between fetch batches, in milliseconds.
    pub batch_pause_ms: u64,
    /// Provider request budget per 60s window.
    pub requests_per_minute: usize,
    /// Concurrent scoring/enrichment tasks.
    pub worker_pool_size: usize,
    /// Capacity of the live-quote subscription set.
    pub subscription_limit: usize,
    /// How many top scorers get promoted to the stream after a cycle.
    pub promote_top_n: usize,
    /// Composite score at or above which a candidate is a top pick.
    pub top_pick_threshold: f64,
    /// Squeeze pre-screen gate.
    pub squeeze_gate: f64,
    /// Early-setup pre-screen gate.
    pub early_setup_gate: f64,
    /// Fallback universe when no screener is configured.
    pub static_universe: Vec<String>,
    /// Price/volume floors applied to screener results.
    pub universe_filter: UniverseFilter,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 60,
            batch_pause_ms: 1500,
            requests_per_minute: 60,
            worker_pool_size: 5,
            subscription_limit: 50,
            promote_top_n: 10,
            top_pick_threshold: 8.0,
            squeeze_gate: 2.0,
            early_setup_gate: 4.0,
            static_universe: Vec::new(),
            universe_filter: UniverseFilter::default(),
        }
    }
}

impl ScanConfig {
    /// Build a config from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let static_universe = env::var("SCAN_UNIVERSE")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            batch_size: env_parse("SCAN_BATCH_SIZE", defaults.batch_size),
            batch_pause_ms: env_parse("SCAN_BATCH_PAUSE_MS", defaults.batch_pause_ms),
            requests_per_minute: env_parse("QUOTE_REQUESTS_PER_MINUTE", defaults.requests_per_minute),
            worker_pool_size: env_parse("SCAN_WORKER_POOL", defaults.worker_pool_size),
            subscription_limit: env_parse("SUBSCRIPTION_LIMIT", defaults.subscription_limit),
            promote_top_n: env_parse("PROMOTE_TOP_N", defaults.promote_top_n),
            top_pick_threshold: env_parse("TOP_PICK_THRESHOLD", defaults.top_pick_threshold),
            squeeze_gate: env_parse("SQUEEZE_GATE", defaults.squeeze_gate),
            early_setup_gate: env_parse("EARLY_SETUP_GATE", defaults.early_setup_gate),
            static_universe,
            universe_filter: UniverseFilter {
                min_price: env_parse_opt("UNIVERSE_MIN_PRICE"),
                max_price: env_parse_opt("UNIVERSE_MAX_PRICE"),
                min_volume: env_parse_opt("UNIVERSE_MIN_VOLUME"),
                limit: env_parse_opt("UNIVERSE_LIMIT"),
            },
        }
    }
}
