//! Batched fetch driver with inter-batch pacing.

use std::future::Future;

use futures_util::future::join_all;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::error::ScanError;

/// Partitions a symbol universe into fixed-size chunks. All fetches within
/// a chunk run concurrently; the driver sleeps a fixed interval between
/// chunks so the provider sees a paced request stream.
pub struct BatchDriver {
    batch_size: usize,
    pause: Duration,
}

impl BatchDriver {
    pub fn new(batch_size: usize, pause: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pause,
        }
    }

    /// Number of batches a universe of `n` symbols splits into.
    pub fn batch_count(&self, n: usize) -> usize {
        n.div_ceil(self.batch_size)
    }

    /// Fetch every symbol, collecting successes in universe order within
    /// each batch. A per-symbol error is logged and dropped; it never
    /// escapes the driver.
    pub async fn run<T, F, Fut>(&self, symbols: &[String], fetch: F) -> Vec<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, ScanError>>,
    {
        let mut results = Vec::with_capacity(symbols.len());
        let batches: Vec<&[String]> = symbols.chunks(self.batch_size).collect();
        let total = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            debug!(
                batch = index + 1,
                total = total,
                size = batch.len(),
                "fetching batch {}/{}",
                index + 1,
                total
            );

            let futures = batch.iter().map(|symbol| fetch(symbol.clone()));
            let settled = join_all(futures).await;

            for (symbol, outcome) in batch.iter().zip(settled) {
                match outcome {
                    Ok(value) => results.push(value),
                    Err(ScanError::Validation { message, .. }) => {
                        // Unusable data is expected for thin symbols; drop quietly.
                        debug!(symbol = %symbol, reason = %message, "symbol excluded: {}", message);
                    }
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "fetch failed for {}, dropped this cycle", symbol);
                    }
                }
            }

            if index + 1 < total {
                sleep(self.pause).await;
            }
        }

        results
    }
}
