//! Candidate persistence.

pub mod memory;
pub mod questdb;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ScanError;
use crate::models::Candidate;

/// Storage backend for scan results. One cycle is written atomically:
/// either every candidate lands or none do.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Persist all candidates of one cycle under a shared cycle timestamp.
    async fn insert_cycle(
        &self,
        candidates: &[Candidate],
        cycle_ts: DateTime<Utc>,
    ) -> Result<(), ScanError>;

    /// Candidates from the most recent cycle, best score first, capped at
    /// `limit`.
    async fn latest(&self, limit: usize) -> Result<Vec<Candidate>, ScanError>;

    /// Candidates across past cycles, newest cycle first, capped at
    /// `limit` rows.
    async fn history(&self, limit: usize) -> Result<Vec<Candidate>, ScanError>;
}

pub use memory::MemoryCandidateStore;
pub use questdb::QuestDatabase;
