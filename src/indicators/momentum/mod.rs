pub mod macd;
pub mod roc;
pub mod rsi;
