//! Unit tests for Donchian channels

use squeezescan::indicators::donchian;

#[test]
fn donchian_empty_for_short_input() {
    let highs = vec![10.0; 5];
    let lows = vec![9.0; 5];
    assert!(donchian(&highs, &lows, 20).is_empty());
}

#[test]
fn donchian_window_extremes() {
    let highs = vec![10.0, 12.0, 11.0, 15.0, 13.0];
    let lows = vec![8.0, 9.0, 7.0, 10.0, 11.0];
    let channels = donchian(&highs, &lows, 3);
    assert_eq!(channels.len(), 3);
    assert!((channels[0].upper - 12.0).abs() < 1e-12);
    assert!((channels[0].lower - 7.0).abs() < 1e-12);
    assert!((channels[2].upper - 15.0).abs() < 1e-12);
    assert!((channels[2].lower - 7.0).abs() < 1e-12);
}

#[test]
fn donchian_uses_shorter_of_mismatched_inputs() {
    let highs = vec![10.0, 11.0, 12.0, 13.0];
    let lows = vec![9.0, 8.0];
    let channels = donchian(&highs, &lows, 2);
    assert_eq!(channels.len(), 1);
}
