//! Pure, stateless technical indicators over ordered price/volume series.
//!
//! Every windowed function returns an empty result when the input is shorter
//! than its period; none of them panic on short input.

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::macd::{macd, macd_with, MacdSeries};
pub use momentum::roc::momentum;
pub use momentum::rsi::{rsi, rsi_last};
pub use structure::donchian::{donchian, DonchianChannel};
pub use structure::support_resistance::{support_resistance, SupportResistance};
pub use trend::ema::{ema, ema_last};
pub use volatility::atr::{atr, atr_last, true_range};
pub use volatility::bollinger::{bollinger, BollingerBand};
pub use volume::{average_volume, volume_spike, volume_spike_ratio};
