//! Provider interfaces for the scan pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::models::{Candle, Fundamentals};

/// Screener options for the universe fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl UniverseFilter {
    /// Whether a screener row passes the price and volume bounds. A bound
    /// only applies when the row actually carries the field.
    pub fn matches(&self, price: Option<f64>, volume: Option<f64>) -> bool {
        if let (Some(min), Some(p)) = (self.min_price, price) {
            if p < min {
                return false;
            }
        }
        if let (Some(max), Some(p)) = (self.max_price, price) {
            if p > max {
                return false;
            }
        }
        if let (Some(min), Some(v)) = (self.min_volume, volume) {
            if v < min {
                return false;
            }
        }
        true
    }
}

/// Raw per-symbol payload from the quote/history provider, before any
/// indicator work. Assembly turns this into `TickerMetrics`.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub prev_close: Option<f64>,
    pub premarket_price: Option<f64>,
    pub history: Vec<Candle>,
    pub fundamentals: Fundamentals,
}

#[async_trait]
pub trait UniverseProvider: Send + Sync {
    /// Ordered list of symbols matching the filter.
    async fn universe(&self, filter: &UniverseFilter) -> Result<Vec<String>, ScanError>;
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Quote, daily history, and fundamentals for one symbol.
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot, ScanError>;
}

/// Fixed symbol list from configuration; used when no screener endpoint is
/// available and in tests.
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }
}

#[async_trait]
impl UniverseProvider for StaticUniverse {
    async fn universe(&self, filter: &UniverseFilter) -> Result<Vec<String>, ScanError> {
        let mut symbols = self.symbols.clone();
        if let Some(limit) = filter.limit {
            symbols.truncate(limit);
        }
        Ok(symbols)
    }
}
