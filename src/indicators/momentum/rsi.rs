//! RSI (Relative Strength Index) with Wilder smoothing.

/// Calculate the RSI series.
///
/// The first value corresponds to input index `period` and is computed from
/// the simple average of gains/losses over the first `period` deltas; later
/// values use Wilder smoothing:
/// `avg_gain = (avg_gain * (period - 1) + gain) / period`.
///
/// Returns one value per input index from `period` onward, or an empty
/// vector when `closes.len() < period + 1`.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let p = period as f64;
    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / p;

    let mut out = Vec::with_capacity(closes.len() - period);
    out.push(rsi_value(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
        out.push(rsi_value(avg_gain, avg_loss));
    }

    out
}

/// Latest RSI value, if the series is long enough.
pub fn rsi_last(closes: &[f64], period: usize) -> Option<f64> {
    rsi(closes, period).last().copied()
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
