//! MACD (Moving Average Convergence Divergence).

use crate::indicators::trend::ema::ema;

/// MACD output, all vectors aligned index-for-index with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    fn empty() -> Self {
        Self {
            macd: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        }
    }

    /// Last two histogram values, oldest first; used for cross detection.
    pub fn histogram_last_two(&self) -> Option<(f64, f64)> {
        let defined: Vec<f64> = self.histogram.iter().filter_map(|v| *v).collect();
        if defined.len() < 2 {
            return None;
        }
        Some((defined[defined.len() - 2], defined[defined.len() - 1]))
    }
}

/// MACD with the standard 12/26/9 periods.
pub fn macd(closes: &[f64]) -> MacdSeries {
    macd_with(closes, 12, 26, 9)
}

/// `macd = EMA(fast) - EMA(slow)`; `signal = EMA(signal_period)` over the
/// valid portion of the macd line, left-padded with `None` to realign;
/// `histogram = macd - signal`.
pub fn macd_with(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    if closes.len() < slow {
        return MacdSeries::empty();
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let macd_line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // Valid portion starts where the slow EMA is first defined.
    let offset = slow - 1;
    let valid: Vec<f64> = macd_line[offset..].iter().filter_map(|v| *v).collect();
    let signal_valid = ema(&valid, signal_period);

    let mut signal_line = vec![None; closes.len()];
    for (i, value) in signal_valid.into_iter().enumerate() {
        signal_line[offset + i] = value;
    }

    let histogram: Vec<Option<f64>> = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
