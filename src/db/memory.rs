//! In-memory candidate store for local runs and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::db::CandidateStore;
use crate::error::ScanError;
use crate::models::Candidate;

#[derive(Default)]
pub struct MemoryCandidateStore {
    cycles: RwLock<Vec<(DateTime<Utc>, Vec<Candidate>)>>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cycle_count(&self) -> usize {
        self.cycles.read().await.len()
    }
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn insert_cycle(
        &self,
        candidates: &[Candidate],
        cycle_ts: DateTime<Utc>,
    ) -> Result<(), ScanError> {
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.cycles.write().await.push((cycle_ts, sorted));
        Ok(())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Candidate>, ScanError> {
        let cycles = self.cycles.read().await;
        let latest = cycles
            .last()
            .map(|(_, candidates)| candidates.iter().take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(latest)
    }

    async fn history(&self, limit: usize) -> Result<Vec<Candidate>, ScanError> {
        let cycles = self.cycles.read().await;
        let rows = cycles
            .iter()
            .rev()
            .flat_map(|(_, candidates)| candidates.iter().cloned())
            .take(limit)
            .collect();
        Ok(rows)
    }
}
