use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Fundamental data merged from the quote provider.
///
/// Explicit named optional fields; a missing field contributes nothing to
/// the score, it is never guessed at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Year-over-year revenue growth as a fraction (0.25 = 25%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth: Option<f64>,
    /// Year-over-year EPS growth as a fraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps_growth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_shares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_short: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_cover: Option<f64>,
    /// Recent news article count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_count: Option<u32>,
    /// Aggregate sentiment in [-1, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,
}

/// Everything the scoring engine needs to know about one symbol, computed
/// once per cycle from the provider snapshot. History is strictly
/// time-ordered oldest-first with no duplicate timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMetrics {
    pub symbol: String,
    pub price: f64,
    pub volume: f64,
    /// Mean daily volume over the trailing 20 bars (latest excluded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg20_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    pub volume_spike: bool,
    /// Latest volume over trailing mean; drives breakout/bounce rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_spike_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    /// Float as a percentage of shares outstanding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_percent: Option<f64>,
    /// Short interest as a percentage of float.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_percent: Option<f64>,
    #[serde(default)]
    pub fundamentals: Fundamentals,
    /// Pre-market move versus previous close, as a fraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premarket_change: Option<f64>,
    pub premarket_spike: bool,
    pub history: Vec<Candle>,
}

impl TickerMetrics {
    /// Bare metrics with no derived fields; used as a starting point by the
    /// assembly step and by tests.
    pub fn new(symbol: impl Into<String>, price: f64, volume: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            volume,
            avg20_volume: None,
            rsi: None,
            momentum: None,
            volume_spike: false,
            volume_spike_ratio: None,
            support: None,
            resistance: None,
            float_percent: None,
            short_percent: None,
            fundamentals: Fundamentals::default(),
            premarket_change: None,
            premarket_spike: false,
            history: Vec::new(),
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.volume).collect()
    }
}
