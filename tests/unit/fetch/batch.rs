//! Unit tests for the batch fetch driver

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use squeezescan::error::ScanError;
use squeezescan::fetch::BatchDriver;
use tokio::time::{Duration, Instant};

fn symbols(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("SYM{}", i)).collect()
}

#[test]
fn batch_count_rounds_up() {
    let driver = BatchDriver::new(60, Duration::from_millis(1500));
    assert_eq!(driver.batch_count(0), 0);
    assert_eq!(driver.batch_count(60), 1);
    assert_eq!(driver.batch_count(61), 2);
    assert_eq!(driver.batch_count(130), 3);
}

#[tokio::test(start_paused = true)]
async fn pauses_between_batches_but_not_after_the_last() {
    let driver = BatchDriver::new(60, Duration::from_millis(1500));
    let universe = symbols(130);

    let start = Instant::now();
    let results = driver.run(&universe, |symbol| async move { Ok(symbol) }).await;

    assert_eq!(results.len(), 130);
    // Three batches mean exactly two pauses.
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
}

#[tokio::test]
async fn single_batch_has_no_pause() {
    let driver = BatchDriver::new(60, Duration::from_secs(3600));
    let universe = symbols(10);
    let results = driver.run(&universe, |symbol| async move { Ok(symbol) }).await;
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn results_preserve_universe_order() {
    let driver = BatchDriver::new(3, Duration::ZERO);
    let universe = symbols(10);
    let results = driver.run(&universe, |symbol| async move { Ok(symbol) }).await;
    assert_eq!(results, universe);
}

#[tokio::test]
async fn one_failure_drops_only_that_symbol() {
    let driver = BatchDriver::new(4, Duration::ZERO);
    let universe = symbols(10);

    let results = driver
        .run(&universe, |symbol| async move {
            if symbol == "SYM4" {
                Err(ScanError::transient(&symbol, "connection reset"))
            } else {
                Ok(symbol)
            }
        })
        .await;

    assert_eq!(results.len(), 9);
    assert!(!results.contains(&"SYM4".to_string()));
}

#[tokio::test]
async fn validation_failures_are_dropped_too() {
    let driver = BatchDriver::new(4, Duration::ZERO);
    let universe = symbols(6);
    let calls = Arc::new(AtomicUsize::new(0));

    let results = driver
        .run(&universe, |symbol| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if symbol == "SYM0" {
                    Err(ScanError::validation(&symbol, "empty history"))
                } else {
                    Ok(symbol)
                }
            }
        })
        .await;

    // Every symbol is attempted even when others fail.
    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert_eq!(results.len(), 5);
}
