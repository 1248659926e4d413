//! Support and resistance levels from the trailing window.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Lowest low (support) and highest high (resistance) over the trailing
/// `lookback` bars. None when there is less than a full window.
pub fn support_resistance(
    highs: &[f64],
    lows: &[f64],
    lookback: usize,
) -> Option<SupportResistance> {
    let len = highs.len().min(lows.len());
    if lookback == 0 || len < lookback {
        return None;
    }

    let resistance = highs[len - lookback..]
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    let support = lows[len - lookback..]
        .iter()
        .cloned()
        .fold(f64::MAX, f64::min);

    Some(SupportResistance {
        support,
        resistance,
    })
}
