//! Donchian channels.

/// Trailing-window channel: highest high and lowest low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonchianChannel {
    pub upper: f64,
    pub lower: f64,
}

/// Rolling Donchian channels over every trailing window of `period` bars.
///
/// Output length is `len - period + 1`; empty when the input is shorter
/// than `period`.
pub fn donchian(highs: &[f64], lows: &[f64], period: usize) -> Vec<DonchianChannel> {
    let len = highs.len().min(lows.len());
    if period == 0 || len < period {
        return Vec::new();
    }

    (0..=len - period)
        .map(|start| {
            let upper = highs[start..start + period]
                .iter()
                .cloned()
                .fold(f64::MIN, f64::max);
            let lower = lows[start..start + period]
                .iter()
                .cloned()
                .fold(f64::MAX, f64::min);
            DonchianChannel { upper, lower }
        })
        .collect()
}
