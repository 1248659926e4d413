//! Unit tests for the token-bucket limiter

use std::sync::Arc;

use squeezescan::fetch::TokenBucket;
use tokio::time::{Duration, Instant};

#[tokio::test(start_paused = true)]
async fn full_bucket_grants_capacity_without_waiting() {
    let bucket = TokenBucket::new(5, Duration::from_secs(60));
    let start = Instant::now();
    for _ in 0..5 {
        bucket.acquire().await;
    }
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn empty_bucket_waits_for_a_refill() {
    let bucket = TokenBucket::new(2, Duration::from_secs(60));
    bucket.acquire().await;
    bucket.acquire().await;

    // One token accrues every window/capacity = 30s.
    let start = Instant::now();
    bucket.acquire().await;
    assert!(start.elapsed() >= Duration::from_secs(29));
}

#[tokio::test(start_paused = true)]
async fn refill_never_exceeds_capacity() {
    let bucket = TokenBucket::new(2, Duration::from_secs(60));
    bucket.acquire().await;
    bucket.acquire().await;

    // A long idle period must not bank more than `capacity` tokens.
    tokio::time::sleep(Duration::from_secs(600)).await;

    let start = Instant::now();
    bucket.acquire().await;
    bucket.acquire().await;
    assert_eq!(start.elapsed(), Duration::ZERO);

    let waited = Instant::now();
    bucket.acquire().await;
    assert!(waited.elapsed() >= Duration::from_secs(29));
}

#[tokio::test(start_paused = true)]
async fn queued_callers_drain_in_turn() {
    let bucket = Arc::new(TokenBucket::new(1, Duration::from_secs(10)));
    bucket.acquire().await;

    let start = Instant::now();
    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let bucket = bucket.clone();
            tokio::spawn(async move { bucket.acquire().await })
        })
        .collect();
    for waiter in waiters {
        waiter.await.unwrap();
    }
    // Three queued acquires at one token per 10s.
    assert!(start.elapsed() >= Duration::from_secs(29));
}
