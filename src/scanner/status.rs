//! Async scan-job tracking for the trigger API.
//!
//! A trigger returns a job id immediately; the cycle runs in a spawned
//! task and reports its progress here. Only the most recent finished jobs
//! are retained; older results are served by the candidate read API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::Candidate;

/// Where a running cycle currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    FetchingUniverse,
    FetchingMetrics,
    Scoring,
    Enriching,
    Persisting,
    Subscribing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running { phase: ScanPhase },
    Done { candidates: Vec<Candidate> },
    Failed { error: String },
}

/// How many finished jobs to keep around for late pollers.
const FINISHED_JOBS_KEPT: usize = 32;

pub struct JobRegistry {
    next_id: AtomicU64,
    jobs: RwLock<HashMap<u64, JobState>>,
    finished_cap: usize,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::with_finished_cap(FINISHED_JOBS_KEPT)
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry retaining at most `cap` finished jobs.
    pub fn with_finished_cap(cap: usize) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            jobs: RwLock::new(HashMap::new()),
            finished_cap: cap,
        }
    }

    /// Register a new pending job and return its id.
    pub async fn submit(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.jobs.write().await.insert(id, JobState::Pending);
        id
    }

    /// Publish a job's state, dropping the oldest finished jobs once more
    /// than the cap have completed. Pending and running jobs are never
    /// evicted.
    pub async fn update(&self, id: u64, state: JobState) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(id, state);
        let mut finished: Vec<u64> = jobs
            .iter()
            .filter(|(_, s)| matches!(s, JobState::Done { .. } | JobState::Failed { .. }))
            .map(|(id, _)| *id)
            .collect();
        if finished.len() > self.finished_cap {
            finished.sort_unstable();
            for old in &finished[..finished.len() - self.finished_cap] {
                jobs.remove(old);
            }
        }
    }

    pub async fn get(&self, id: u64) -> Option<JobState> {
        self.jobs.read().await.get(&id).cloned()
    }
}

/// Handle a running cycle uses to publish its phase.
#[derive(Clone)]
pub struct JobTracker {
    registry: Arc<JobRegistry>,
    id: u64,
}

impl JobTracker {
    pub fn new(registry: Arc<JobRegistry>, id: u64) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn phase(&self, phase: ScanPhase) {
        self.registry
            .update(self.id, JobState::Running { phase })
            .await;
    }

    pub async fn done(&self, candidates: Vec<Candidate>) {
        self.registry
            .update(self.id, JobState::Done { candidates })
            .await;
    }

    pub async fn failed(&self, error: String) {
        self.registry
            .update(self.id, JobState::Failed { error })
            .await;
    }
}
