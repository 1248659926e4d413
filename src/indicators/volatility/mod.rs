pub mod atr;
pub mod bollinger;
