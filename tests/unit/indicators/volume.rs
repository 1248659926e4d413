//! Unit tests for volume statistics

use squeezescan::indicators::{average_volume, volume_spike, volume_spike_ratio};

#[test]
fn average_volume_excludes_latest_bar() {
    let mut volumes = vec![100.0; 20];
    volumes.push(1000.0);
    let avg = average_volume(&volumes, 20).unwrap();
    assert!((avg - 100.0).abs() < 1e-12);
}

#[test]
fn average_volume_needs_period_plus_one_bars() {
    let volumes = vec![100.0; 20];
    assert!(average_volume(&volumes, 20).is_none());
}

#[test]
fn spike_ratio_compares_latest_to_prior_mean() {
    let volumes = vec![100.0, 100.0, 100.0, 300.0];
    let ratio = volume_spike_ratio(&volumes).unwrap();
    assert!((ratio - 3.0).abs() < 1e-12);
}

#[test]
fn spike_ratio_none_for_single_bar() {
    assert!(volume_spike_ratio(&[100.0]).is_none());
}

#[test]
fn positive_volume_after_silent_tape_is_a_spike() {
    assert_eq!(
        volume_spike_ratio(&[0.0, 0.0, 500.0]),
        Some(f64::INFINITY)
    );
    assert!(volume_spike(&[0.0, 0.0, 500.0], 2.0));
    assert!(volume_spike_ratio(&[0.0, 0.0, 0.0]).is_none());
}

#[test]
fn spike_threshold_is_strict() {
    let exactly_double = vec![100.0, 100.0, 200.0];
    assert!(!volume_spike(&exactly_double, 2.0));

    let just_over = vec![100.0, 100.0, 201.0];
    assert!(volume_spike(&just_over, 2.0));
}
