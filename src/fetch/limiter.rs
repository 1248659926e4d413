//! Token-bucket limiter for external request budgets.

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Token bucket refilling `capacity` tokens per `window`.
///
/// `acquire` suspends the caller until a token is available; requests queue
/// behind the budget, they are never dropped. One bucket per external
/// dependency.
pub struct TokenBucket {
    capacity: f64,
    window: Duration,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket with a budget of `capacity` requests per `window`.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1) as f64,
            window,
            state: Mutex::new(BucketState {
                tokens: capacity.max(1) as f64,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Budget of `capacity` requests per 60 seconds.
    pub fn per_minute(capacity: usize) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Take one token, waiting for a refill if the bucket is empty.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let elapsed = state.last_refill.elapsed();
                let refill = elapsed.as_secs_f64() * self.capacity / self.window.as_secs_f64();
                state.tokens = (state.tokens + refill).min(self.capacity);
                state.last_refill = Instant::now();

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                // Time until one full token accrues.
                Duration::from_secs_f64(
                    (1.0 - state.tokens) * self.window.as_secs_f64() / self.capacity,
                )
            };
            sleep(wait).await;
        }
    }
}
