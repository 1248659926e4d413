//! Bounded LRU set of live quote-stream subscriptions.
//!
//! Promotion order is recency of scan interest, not insertion: re-promoting
//! a tracked symbol moves it to the back of the eviction queue without
//! touching the stream. At capacity the least-recently-promoted symbol is
//! evicted first, and eviction proceeds even when the unsubscribe call
//! fails so the stream cannot wedge the set.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ScanError;
use crate::metrics::Metrics;
use crate::services::stream::QuoteStream;

pub struct SubscriptionSet {
    queue: VecDeque<String>,
    members: HashSet<String>,
    limit: usize,
    stream: Arc<dyn QuoteStream>,
    metrics: Option<Arc<Metrics>>,
}

impl SubscriptionSet {
    pub fn new(limit: usize, stream: Arc<dyn QuoteStream>) -> Self {
        Self {
            queue: VecDeque::with_capacity(limit),
            members: HashSet::with_capacity(limit),
            limit,
            stream,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Track a symbol, subscribing on the stream if it is new and evicting
    /// the oldest entry when the set is full. Idempotent for symbols
    /// already tracked: their recency is refreshed with no stream traffic.
    pub async fn ensure(&mut self, symbol: &str) -> Result<(), ScanError> {
        if self.members.contains(symbol) {
            self.touch(symbol);
            return Ok(());
        }

        if self.queue.len() >= self.limit {
            if let Some(evicted) = self.queue.pop_front() {
                self.members.remove(&evicted);
                if let Err(e) = self.stream.unsubscribe(&evicted).await {
                    // Stale server-side subscription; it will lapse on its
                    // own and must not block tracking the new symbol.
                    warn!(symbol = %evicted, error = %e, "unsubscribe failed during eviction");
                }
                debug!(symbol = %evicted, "evicted least recent subscription");
                if let Some(m) = &self.metrics {
                    m.subscription_evictions_total.inc();
                }
            }
        }

        self.stream.subscribe(symbol).await?;
        self.queue.push_back(symbol.to_string());
        self.members.insert(symbol.to_string());
        Ok(())
    }

    fn touch(&mut self, symbol: &str) {
        if let Some(pos) = self.queue.iter().position(|s| s == symbol) {
            if let Some(entry) = self.queue.remove(pos) {
                self.queue.push_back(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.members.contains(symbol)
    }

    /// Tracked symbols, least recently promoted first.
    pub fn symbols(&self) -> Vec<String> {
        self.queue.iter().cloned().collect()
    }
}
