//! Turns a raw provider snapshot into scored-ready [`TickerMetrics`].

use crate::error::ScanError;
use crate::indicators::{
    average_volume, momentum, rsi_last, support_resistance, volume_spike, volume_spike_ratio,
};
use crate::models::TickerMetrics;
use crate::services::market_data::QuoteSnapshot;

const RSI_PERIOD: usize = 14;
const VOLUME_PERIOD: usize = 20;
const SR_LOOKBACK: usize = 20;
const SPIKE_FACTOR: f64 = 2.0;
const PREMARKET_SPIKE_THRESHOLD: f64 = 0.03;

/// Validate the snapshot and compute every derived field the scoring
/// engine reads. History is sorted oldest-first and de-duplicated by
/// timestamp before any indicator runs.
pub fn build_metrics(snapshot: QuoteSnapshot) -> Result<TickerMetrics, ScanError> {
    let QuoteSnapshot {
        symbol,
        price,
        volume,
        prev_close,
        premarket_price,
        mut history,
        fundamentals,
    } = snapshot;

    if history.is_empty() {
        return Err(ScanError::validation(&symbol, "empty price history"));
    }
    history.sort_by_key(|c| c.timestamp);
    history.dedup_by_key(|c| c.timestamp);

    let last = &history[history.len() - 1];
    let price = match price.or(Some(last.close)) {
        Some(p) if p > 0.0 => p,
        _ => return Err(ScanError::validation(&symbol, "missing or non-positive price")),
    };
    let volume = volume.unwrap_or(last.volume);

    let closes: Vec<f64> = history.iter().map(|c| c.close).collect();
    let highs: Vec<f64> = history.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = history.iter().map(|c| c.low).collect();
    let volumes: Vec<f64> = history.iter().map(|c| c.volume).collect();

    let levels = support_resistance(&highs, &lows, SR_LOOKBACK);

    let float_percent = match (fundamentals.float_shares, fundamentals.shares_outstanding) {
        (Some(float), Some(outstanding)) if outstanding > 0.0 => {
            Some(float / outstanding * 100.0)
        }
        _ => None,
    };
    let short_percent = match (fundamentals.shares_short, fundamentals.float_shares) {
        (Some(short), Some(float)) if float > 0.0 => Some(short / float * 100.0),
        _ => None,
    };

    let premarket_change = match (premarket_price, prev_close) {
        (Some(pre), Some(prev)) if prev > 0.0 => Some((pre - prev) / prev),
        _ => None,
    };

    Ok(TickerMetrics {
        symbol,
        price,
        volume,
        avg20_volume: average_volume(&volumes, VOLUME_PERIOD),
        rsi: rsi_last(&closes, RSI_PERIOD),
        momentum: momentum(&closes),
        volume_spike: volume_spike(&volumes, SPIKE_FACTOR),
        volume_spike_ratio: volume_spike_ratio(&volumes),
        support: levels.map(|l| l.support),
        resistance: levels.map(|l| l.resistance),
        float_percent,
        short_percent,
        fundamentals,
        premarket_change,
        premarket_spike: premarket_change
            .map(|c| c > PREMARKET_SPIKE_THRESHOLD)
            .unwrap_or(false),
        history,
    })
}
