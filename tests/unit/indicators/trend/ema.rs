//! Unit tests for the EMA indicator

use squeezescan::indicators::{ema, ema_last};

#[test]
fn ema_empty_for_short_input() {
    let series = vec![1.0, 2.0, 3.0];
    assert!(ema(&series, 5).is_empty());
    assert!(ema_last(&series, 5).is_none());
}

#[test]
fn ema_aligns_with_input_and_seeds_at_period_minus_one() {
    let series: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let out = ema(&series, 5);
    assert_eq!(out.len(), series.len());
    for i in 0..4 {
        assert!(out[i].is_none());
    }
    // Seed is the SMA of the first five values: (0+1+2+3+4)/5.
    assert!((out[4].unwrap() - 2.0).abs() < 1e-12);
}

#[test]
fn ema_of_constant_series_is_the_constant() {
    let series = vec![42.0; 30];
    let out = ema(&series, 10);
    for value in out.into_iter().flatten() {
        assert!((value - 42.0).abs() < 1e-12);
    }
}

#[test]
fn ema_tracks_recent_values_more_closely_than_sma() {
    // A jump at the end should pull the EMA above the full-series mean.
    let mut series = vec![100.0; 30];
    series.extend(vec![120.0; 5]);
    let last = ema_last(&series, 10).unwrap();
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    assert!(last > mean);
}

#[test]
fn ema_recurrence_uses_standard_smoothing_factor() {
    let series = vec![1.0, 2.0, 3.0, 4.0];
    let out = ema(&series, 3);
    let seed = 2.0; // (1+2+3)/3
    let k = 2.0 / 4.0;
    let expected = 4.0 * k + seed * (1.0 - k);
    assert!((out[3].unwrap() - expected).abs() < 1e-12);
}
