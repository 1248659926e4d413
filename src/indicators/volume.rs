//! Volume statistics.

/// Mean of the trailing `period` volumes, excluding the latest bar.
/// None when there are not enough prior bars.
pub fn average_volume(volumes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || volumes.len() < period + 1 {
        return None;
    }
    let prior = &volumes[..volumes.len() - 1];
    let window = &prior[prior.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Latest volume divided by the mean of all prior volumes.
pub fn volume_spike_ratio(volumes: &[f64]) -> Option<f64> {
    if volumes.len() < 2 {
        return None;
    }
    let prior = &volumes[..volumes.len() - 1];
    let latest = volumes[volumes.len() - 1];
    let mean = prior.iter().sum::<f64>() / prior.len() as f64;
    if mean == 0.0 {
        // Any positive volume after a silent tape clears every factor.
        return (latest > 0.0).then_some(f64::INFINITY);
    }
    Some(latest / mean)
}

/// True when the latest volume exceeds `factor` times the mean of all
/// prior volumes.
pub fn volume_spike(volumes: &[f64], factor: f64) -> bool {
    volume_spike_ratio(volumes)
        .map(|ratio| ratio > factor)
        .unwrap_or(false)
}
