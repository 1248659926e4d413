//! One-bar rate of change.

/// Momentum of the latest close versus the previous one:
/// `(last - prev) / prev`. None when fewer than two closes or the previous
/// close is zero.
pub fn momentum(closes: &[f64]) -> Option<f64> {
    if closes.len() < 2 {
        return None;
    }
    let prev = closes[closes.len() - 2];
    if prev == 0.0 {
        return None;
    }
    let last = closes[closes.len() - 1];
    Some((last - prev) / prev)
}
