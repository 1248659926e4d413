//! Cheap pre-screen heuristics gating the expensive enrichment phase.

use crate::config::ScanConfig;
use crate::models::TickerMetrics;

/// Rule-based pre-screen totals for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prescreen {
    pub squeeze: f64,
    pub early_setup: f64,
}

/// Squeeze heuristic: short float > 20 (+2), RSI < 40 (+1), volume spike
/// (+2), momentum > 3% (+1).
pub fn squeeze_score(m: &TickerMetrics) -> f64 {
    let mut score = 0.0;
    if m.short_percent.map(|s| s > 20.0).unwrap_or(false) {
        score += 2.0;
    }
    if m.rsi.map(|r| r < 40.0).unwrap_or(false) {
        score += 1.0;
    }
    if m.volume_spike {
        score += 2.0;
    }
    if m.momentum.map(|mo| mo > 0.03).unwrap_or(false) {
        score += 1.0;
    }
    score
}

/// Early-setup heuristic: short float > 15 (+2), RSI in (30, 45) (+2), no
/// volume spike yet (+1), momentum in (1%, 3%) (+1).
pub fn early_setup_score(m: &TickerMetrics) -> f64 {
    let mut score = 0.0;
    if m.short_percent.map(|s| s > 15.0).unwrap_or(false) {
        score += 2.0;
    }
    if m.rsi.map(|r| r > 30.0 && r < 45.0).unwrap_or(false) {
        score += 2.0;
    }
    if !m.volume_spike {
        score += 1.0;
    }
    if m.momentum.map(|mo| mo > 0.01 && mo < 0.03).unwrap_or(false) {
        score += 1.0;
    }
    score
}

impl Prescreen {
    pub fn evaluate(m: &TickerMetrics) -> Self {
        Self {
            squeeze: squeeze_score(m),
            early_setup: early_setup_score(m),
        }
    }
}

/// A symbol proceeds to scoring/enrichment only when it clears either gate;
/// otherwise the cycle emits no candidate for it.
pub fn passes_gate(pre: &Prescreen, config: &ScanConfig) -> bool {
    pre.squeeze >= config.squeeze_gate || pre.early_setup >= config.early_setup_gate
}
