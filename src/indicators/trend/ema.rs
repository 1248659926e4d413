//! EMA (Exponential Moving Average) indicator.

/// Calculate the EMA series, aligned index-for-index with the input.
///
/// The seed at index `period - 1` is the simple mean of the first `period`
/// values; afterwards `ema[i] = price[i] * k + ema[i-1] * (1 - k)` with
/// `k = 2 / (period + 1)`. Indices before `period - 1` are `None`.
///
/// Returns an empty vector when `series.len() < period`.
pub fn ema(series: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || series.len() < period {
        return Vec::new();
    }

    let mut out = vec![None; series.len()];
    let seed = series[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(seed);

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..series.len() {
        let value = series[i] * k + prev * (1.0 - k);
        out[i] = Some(value);
        prev = value;
    }

    out
}

/// Latest EMA value, if the series is long enough.
pub fn ema_last(series: &[f64], period: usize) -> Option<f64> {
    ema(series, period).last().copied().flatten()
}
