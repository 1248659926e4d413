//! Bollinger Bands.

/// One rolling band: mean ± k × population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Rolling Bollinger Bands over every trailing window of `period` closes.
///
/// Output length is `closes.len() - period + 1`; empty when the input is
/// shorter than `period`.
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> Vec<BollingerBand> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    closes
        .windows(period)
        .map(|window| {
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance =
                window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            let std = variance.sqrt();
            BollingerBand {
                upper: mean + k * std,
                middle: mean,
                lower: mean - k * std,
            }
        })
        .collect()
}
