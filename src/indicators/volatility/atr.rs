//! ATR (Average True Range) with Wilder smoothing.

/// True range of one bar against the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Calculate the ATR series.
///
/// The seed is the simple mean of the first `period` true ranges; later
/// values use Wilder smoothing:
/// `atr[i] = (atr[i-1] * (period - 1) + tr[i]) / period`.
///
/// Returns an empty vector when there are fewer than `period` true ranges
/// (i.e. fewer than `period + 1` bars).
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let len = highs.len().min(lows.len()).min(closes.len());
    if period == 0 || len < period + 1 {
        return Vec::new();
    }

    let mut trs = Vec::with_capacity(len - 1);
    for i in 1..len {
        trs.push(true_range(highs[i], lows[i], closes[i - 1]));
    }

    let p = period as f64;
    let seed = trs[..period].iter().sum::<f64>() / p;

    let mut out = Vec::with_capacity(trs.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for tr in &trs[period..] {
        let value = (prev * (p - 1.0) + tr) / p;
        out.push(value);
        prev = value;
    }

    out
}

/// Latest ATR value, if the series is long enough.
pub fn atr_last(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    atr(highs, lows, closes, period).last().copied()
}
