use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::metrics::TickerMetrics;

/// What the advisory service recommends doing about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisoryAction {
    Buy,
    Hold,
    Sell,
}

impl std::fmt::Display for AdvisoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryAction::Buy => write!(f, "Buy"),
            AdvisoryAction::Hold => write!(f, "Hold"),
            AdvisoryAction::Sell => write!(f, "Sell"),
        }
    }
}

impl std::str::FromStr for AdvisoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Buy" | "buy" | "BUY" => Ok(AdvisoryAction::Buy),
            "Hold" | "hold" | "HOLD" => Ok(AdvisoryAction::Hold),
            "Sell" | "sell" | "SELL" => Ok(AdvisoryAction::Sell),
            other => Err(format!("unknown advisory action: {}", other)),
        }
    }
}

/// Enrichment returned by the external advisory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub action: AdvisoryAction,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_target: Option<f64>,
}

/// Output of the composite scoring engine.
///
/// Pure function of [`TickerMetrics`]: same input, same output. Reasons are
/// appended in evaluation order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total_score: f64,
    pub reasons: Vec<String>,
    pub is_top_pick: bool,
    /// Weighted contribution of every signal, for audit.
    pub components: BTreeMap<String, f64>,
}

impl ScoreResult {
    pub fn component(&self, name: &str) -> f64 {
        self.components.get(name).copied().unwrap_or(0.0)
    }
}

/// Fully scored, optionally advisory-enriched snapshot for one symbol in
/// one cycle. Created once, written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub price: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    pub volume_spike: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_percent: Option<f64>,
    pub score: ScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
    pub cycle_ts: DateTime<Utc>,
}

impl Candidate {
    pub fn new(metrics: &TickerMetrics, score: ScoreResult, cycle_ts: DateTime<Utc>) -> Self {
        Self {
            symbol: metrics.symbol.clone(),
            price: metrics.price,
            volume: metrics.volume,
            rsi: metrics.rsi,
            momentum: metrics.momentum,
            volume_spike: metrics.volume_spike,
            support: metrics.support,
            resistance: metrics.resistance,
            float_percent: metrics.float_percent,
            short_percent: metrics.short_percent,
            score,
            advisory: None,
            cycle_ts,
        }
    }

    pub fn with_advisory(mut self, advisory: Advisory) -> Self {
        self.advisory = Some(advisory);
        self
    }
}
