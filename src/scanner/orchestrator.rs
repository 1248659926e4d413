//! Scan cycle orchestration.
//!
//! One cycle walks the whole pipeline: universe, paced metric fetch,
//! gate + score, optional advisory enrichment, one atomic write, then
//! promotion of the top scorers onto the live quote stream. Per-symbol
//! failures shrink the cycle; universe and persistence failures abort it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use crate::config::ScanConfig;
use crate::db::CandidateStore;
use crate::error::ScanError;
use crate::fetch::{BatchDriver, TokenBucket};
use crate::metrics::Metrics;
use crate::models::Candidate;
use crate::scanner::assemble::build_metrics;
use crate::scanner::status::{JobTracker, ScanPhase};
use crate::scoring::{passes_gate, Prescreen, ScoreEngine};
use crate::services::advisory::AdvisoryProvider;
use crate::services::market_data::{QuoteProvider, UniverseProvider};
use crate::subscriptions::SubscriptionSet;

pub struct Scanner {
    config: ScanConfig,
    universe: Arc<dyn UniverseProvider>,
    quotes: Arc<dyn QuoteProvider>,
    advisory: Option<Arc<dyn AdvisoryProvider>>,
    store: Arc<dyn CandidateStore>,
    subscriptions: Arc<Mutex<SubscriptionSet>>,
    limiter: TokenBucket,
    engine: ScoreEngine,
    metrics: Option<Arc<Metrics>>,
}

impl Scanner {
    pub fn new(
        config: ScanConfig,
        universe: Arc<dyn UniverseProvider>,
        quotes: Arc<dyn QuoteProvider>,
        advisory: Option<Arc<dyn AdvisoryProvider>>,
        store: Arc<dyn CandidateStore>,
        subscriptions: Arc<Mutex<SubscriptionSet>>,
    ) -> Self {
        let limiter = TokenBucket::per_minute(config.requests_per_minute);
        let engine = ScoreEngine::new(&config);
        Self {
            config,
            universe,
            quotes,
            advisory,
            store,
            subscriptions,
            limiter,
            engine,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> Arc<dyn CandidateStore> {
        Arc::clone(&self.store)
    }

    /// Run one full scan cycle. Returns the persisted candidates, best
    /// score first.
    pub async fn run_cycle(&self, tracker: Option<&JobTracker>) -> Result<Vec<Candidate>, ScanError> {
        let started = Instant::now();
        let cycle_ts = Utc::now();

        let result = self.run_pipeline(tracker, cycle_ts).await;

        if let Some(metrics) = &self.metrics {
            metrics.scan_cycles_total.inc();
            metrics
                .scan_cycle_duration_seconds
                .observe(started.elapsed().as_secs_f64());
            match &result {
                Ok(candidates) => {
                    metrics.candidates_emitted_total.inc_by(candidates.len() as u64);
                }
                Err(_) => metrics.scan_cycles_failed.inc(),
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        tracker: Option<&JobTracker>,
        cycle_ts: chrono::DateTime<Utc>,
    ) -> Result<Vec<Candidate>, ScanError> {
        if let Some(t) = tracker {
            t.phase(ScanPhase::FetchingUniverse).await;
        }
        let symbols = self
            .universe
            .universe(&self.config.universe_filter)
            .await
            .map_err(|e| if e.is_fatal() { e } else { ScanError::fatal(e) })?;
        if symbols.is_empty() {
            warn!("universe is empty, nothing to scan");
            return Ok(Vec::new());
        }
        info!(symbols = symbols.len(), "scan cycle started");

        if let Some(t) = tracker {
            t.phase(ScanPhase::FetchingMetrics).await;
        }
        let driver = BatchDriver::new(
            self.config.batch_size,
            Duration::from_millis(self.config.batch_pause_ms),
        );
        let metrics_rows = driver
            .run(&symbols, |symbol| async move {
                self.limiter.acquire().await;
                let snapshot = self.quotes.fetch_quote(&symbol).await?;
                build_metrics(snapshot)
            })
            .await;
        let dropped = symbols.len() - metrics_rows.len();
        if dropped > 0 {
            info!(dropped = dropped, "symbols dropped this cycle");
            if let Some(m) = &self.metrics {
                m.symbols_dropped_total.inc_by(dropped as u64);
            }
        }

        if let Some(t) = tracker {
            t.phase(ScanPhase::Scoring).await;
        }
        let mut candidates: Vec<Candidate> = metrics_rows
            .iter()
            .filter(|m| passes_gate(&Prescreen::evaluate(m), &self.config))
            .map(|m| Candidate::new(m, self.engine.score(m), cycle_ts))
            .collect();
        info!(
            scanned = metrics_rows.len(),
            gated = candidates.len(),
            "pre-screen gate applied"
        );

        if let Some(t) = tracker {
            t.phase(ScanPhase::Enriching).await;
        }
        if let Some(provider) = &self.advisory {
            candidates = self.enrich(provider, candidates).await;
        }

        candidates.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(t) = tracker {
            t.phase(ScanPhase::Persisting).await;
        }
        self.store.insert_cycle(&candidates, cycle_ts).await?;

        if let Some(t) = tracker {
            t.phase(ScanPhase::Subscribing).await;
        }
        let mut subscriptions = self.subscriptions.lock().await;
        for candidate in candidates.iter().take(self.config.promote_top_n) {
            if let Err(e) = subscriptions.ensure(&candidate.symbol).await {
                warn!(symbol = %candidate.symbol, error = %e, "subscription failed for {}", candidate.symbol);
            }
        }
        drop(subscriptions);

        info!(
            candidates = candidates.len(),
            top_picks = candidates.iter().filter(|c| c.score.is_top_pick).count(),
            "scan cycle complete"
        );
        Ok(candidates)
    }

    /// Run every gated candidate past the advisory service with bounded
    /// concurrency. A failed call keeps the candidate with its rule-based
    /// defaults.
    async fn enrich(
        &self,
        provider: &Arc<dyn AdvisoryProvider>,
        candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        let semaphore = Arc::new(Semaphore::new(self.config.worker_pool_size.max(1)));
        let tasks = candidates.into_iter().map(|candidate| {
            let provider = Arc::clone(provider);
            let semaphore = Arc::clone(&semaphore);
            let metrics = self.metrics.clone();
            async move {
                let _permit = semaphore.acquire().await.ok();
                match provider.advise(&candidate).await {
                    Ok(advisory) => candidate.with_advisory(advisory),
                    Err(e) => {
                        warn!(symbol = %candidate.symbol, error = %e, "advisory failed for {}, keeping defaults", candidate.symbol);
                        if let Some(m) = &metrics {
                            m.advisory_failures_total.inc();
                        }
                        candidate
                    }
                }
            }
        });
        join_all(tasks).await
    }

    /// Run a cycle under a job tracker, recording the terminal state.
    pub async fn run_tracked(self: Arc<Self>, tracker: JobTracker) {
        match self.run_cycle(Some(&tracker)).await {
            Ok(candidates) => tracker.done(candidates).await,
            Err(e) => {
                error!(job = tracker.id(), error = %e, "scan cycle failed");
                tracker.failed(e.to_string()).await;
            }
        }
    }
}
