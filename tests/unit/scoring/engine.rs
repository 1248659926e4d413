//! Unit tests for the composite scoring engine

use chrono::{Duration, Utc};
use squeezescan::config::ScanConfig;
use squeezescan::models::{Candle, TickerMetrics};
use squeezescan::scoring::ScoreEngine;

fn metrics_with_history(closes: &[f64]) -> TickerMetrics {
    let start = Utc::now() - Duration::days(closes.len() as i64);
    let history: Vec<Candle> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Candle::new(
                close,
                close + 0.5,
                close - 0.5,
                close,
                100_000.0,
                start + Duration::days(i as i64),
            )
        })
        .collect();
    let mut m = TickerMetrics::new("TEST", *closes.last().unwrap(), 100_000.0);
    m.history = history;
    m
}

#[test]
fn scoring_is_pure() {
    let engine = ScoreEngine::default();
    let closes: Vec<f64> = (0..60).map(|i| 10.0 + (i as f64 * 0.4).sin()).collect();
    let mut m = metrics_with_history(&closes);
    m.rsi = Some(35.0);
    m.momentum = Some(0.04);
    m.volume_spike = true;

    let a = engine.score(&m);
    let b = engine.score(&m);
    assert_eq!(a, b);
}

#[test]
fn reasons_follow_evaluation_order() {
    let engine = ScoreEngine::default();
    let closes: Vec<f64> = (0..60).map(|i| 10.0 + i as f64 * 0.01).collect();
    let mut m = metrics_with_history(&closes);
    m.short_percent = Some(25.0);
    m.volume_spike = true;

    let result = engine.score(&m);
    assert!(result.reasons[0].starts_with("Squeeze setup"));
}

#[test]
fn overbought_rsi_subtracts_from_the_total() {
    let engine = ScoreEngine::default();
    let closes = vec![10.0; 5];
    let mut m = metrics_with_history(&closes);
    m.rsi = Some(80.0);

    let result = engine.score(&m);
    assert_eq!(result.component("rsi"), -1.0);
}

#[test]
fn oversold_rsi_grades_linearly() {
    let engine = ScoreEngine::default();
    let closes = vec![10.0; 5];
    let mut m = metrics_with_history(&closes);
    m.rsi = Some(30.0);

    let result = engine.score(&m);
    assert!((result.component("rsi") - 0.5).abs() < 1e-12);
}

#[test]
fn volume_spike_component_is_double_weighted() {
    let engine = ScoreEngine::default();
    let closes = vec![10.0; 5];
    let mut m = metrics_with_history(&closes);
    m.avg20_volume = Some(100_000.0);
    m.volume = 400_000.0; // 4x average: spike norm saturates at 1.0
    m.volume_spike = true;

    let result = engine.score(&m);
    assert!((result.component("spike") - 2.0).abs() < 1e-12);
}

#[test]
fn breakout_requires_elevated_volume() {
    let engine = ScoreEngine::default();
    let closes = vec![10.0; 5];

    let mut quiet = metrics_with_history(&closes);
    quiet.resistance = Some(9.0);
    quiet.volume_spike_ratio = Some(1.2);
    assert_eq!(engine.score(&quiet).component("breakout"), 0.0);

    let mut loud = metrics_with_history(&closes);
    loud.resistance = Some(9.0);
    loud.volume_spike_ratio = Some(2.0);
    assert_eq!(engine.score(&loud).component("breakout"), 2.0);
}

#[test]
fn fundamentals_combo_and_leverage_tiers() {
    let engine = ScoreEngine::default();
    let closes = vec![10.0; 5];
    let mut m = metrics_with_history(&closes);
    m.fundamentals.revenue_growth = Some(0.3);
    m.fundamentals.eps_growth = Some(0.25);
    m.fundamentals.debt_to_equity = Some(0.3);

    // Growth combo +2, low leverage +2.
    assert!((engine.score(&m).component("fundamentals") - 4.0).abs() < 1e-12);

    m.fundamentals.debt_to_equity = Some(2.5);
    assert!((engine.score(&m).component("fundamentals") - 1.0).abs() < 1e-12);
}

#[test]
fn top_pick_flag_uses_configured_threshold() {
    let mut config = ScanConfig::default();
    config.top_pick_threshold = 1.0;
    let engine = ScoreEngine::new(&config);

    let closes = vec![10.0; 5];
    let mut m = metrics_with_history(&closes);
    m.rsi = Some(20.0);
    m.momentum = Some(0.08);
    m.volume_spike = true;

    let result = engine.score(&m);
    assert!(result.total_score >= 1.0);
    assert!(result.is_top_pick);

    let strict = ScoreEngine::new(&ScanConfig::default());
    let flat = metrics_with_history(&closes);
    assert!(!strict.score(&flat).is_top_pick);
}

#[test]
fn every_signal_has_a_component_entry() {
    let engine = ScoreEngine::default();
    let closes: Vec<f64> = (0..60).map(|i| 10.0 + i as f64 * 0.05).collect();
    let result = engine.score(&metrics_with_history(&closes));

    for key in [
        "squeeze",
        "early_setup",
        "volume",
        "spike",
        "rsi",
        "momentum",
        "float",
        "short_interest",
        "breakout",
        "bounce",
        "ema_cross",
        "macd",
        "atr_regime",
        "bollinger",
        "donchian",
        "fundamentals",
        "news",
        "sentiment",
        "premarket",
    ] {
        assert!(result.components.contains_key(key), "missing component {}", key);
    }
}

#[test]
fn scores_are_never_nan() {
    let engine = ScoreEngine::default();
    let mut m = TickerMetrics::new("EDGE", 0.01, 0.0);
    m.avg20_volume = Some(0.0);
    m.momentum = Some(f64::MIN_POSITIVE);

    let result = engine.score(&m);
    assert!(result.total_score.is_finite());
}
