//! Error taxonomy for the scan pipeline.
//!
//! Per-symbol failures (`TransientFetch`, `Validation`) are caught inside the
//! batch loop and drop only that symbol. `Advisory` failures skip enrichment
//! but keep the candidate. `PipelineFatal` aborts the whole cycle with no
//! partial write.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Provider hiccup for one symbol; excluded this cycle, retried next.
    #[error("transient fetch error for {symbol}: {message}")]
    TransientFetch { symbol: String, message: String },

    /// Unusable payload (missing price, empty history); excluded silently.
    #[error("invalid data for {symbol}: {message}")]
    Validation { symbol: String, message: String },

    /// Advisory call failed or returned garbage; candidate keeps rule-based
    /// defaults.
    #[error("advisory error: {0}")]
    Advisory(String),

    /// Live quote stream subscribe/unsubscribe failure.
    #[error("quote stream error: {0}")]
    Stream(String),

    /// Universe fetch or persistence failure; the cycle aborts atomically.
    #[error("pipeline fatal: {0}")]
    PipelineFatal(String),
}

impl ScanError {
    pub fn transient(symbol: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::TransientFetch {
            symbol: symbol.into(),
            message: err.to_string(),
        }
    }

    pub fn validation(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    pub fn fatal(err: impl std::fmt::Display) -> Self {
        Self::PipelineFatal(err.to_string())
    }

    /// True for errors that abort the whole cycle rather than one symbol.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PipelineFatal(_))
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
