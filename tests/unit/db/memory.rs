//! Unit tests for the in-memory candidate store

use chrono::{Duration, Utc};
use squeezescan::db::{CandidateStore, MemoryCandidateStore};
use squeezescan::models::{Candidate, ScoreResult, TickerMetrics};

fn candidate(symbol: &str, score: f64, cycle_ts: chrono::DateTime<chrono::Utc>) -> Candidate {
    let metrics = TickerMetrics::new(symbol, 10.0, 100_000.0);
    let result = ScoreResult {
        total_score: score,
        reasons: vec![format!("score {}", score)],
        is_top_pick: score >= 8.0,
        components: Default::default(),
    };
    Candidate::new(&metrics, result, cycle_ts)
}

#[tokio::test]
async fn latest_returns_last_cycle_best_first() {
    let store = MemoryCandidateStore::new();
    let ts1 = Utc::now() - Duration::minutes(10);
    let ts2 = Utc::now();

    store
        .insert_cycle(&[candidate("OLD", 9.0, ts1)], ts1)
        .await
        .unwrap();
    store
        .insert_cycle(
            &[candidate("LOW", 2.0, ts2), candidate("HIGH", 9.5, ts2)],
            ts2,
        )
        .await
        .unwrap();

    let latest = store.latest(10).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].symbol, "HIGH");
    assert_eq!(latest[1].symbol, "LOW");
}

#[tokio::test]
async fn latest_respects_limit() {
    let store = MemoryCandidateStore::new();
    let ts = Utc::now();
    let cycle: Vec<Candidate> = (0..5)
        .map(|i| candidate(&format!("S{}", i), i as f64, ts))
        .collect();
    store.insert_cycle(&cycle, ts).await.unwrap();

    let latest = store.latest(2).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].symbol, "S4");
}

#[tokio::test]
async fn history_is_newest_cycle_first() {
    let store = MemoryCandidateStore::new();
    let ts1 = Utc::now() - Duration::minutes(10);
    let ts2 = Utc::now();

    store
        .insert_cycle(&[candidate("FIRST", 5.0, ts1)], ts1)
        .await
        .unwrap();
    store
        .insert_cycle(&[candidate("SECOND", 5.0, ts2)], ts2)
        .await
        .unwrap();

    let history = store.history(10).await.unwrap();
    assert_eq!(history[0].symbol, "SECOND");
    assert_eq!(history[1].symbol, "FIRST");
}

#[tokio::test]
async fn empty_store_reads_empty() {
    let store = MemoryCandidateStore::new();
    assert!(store.latest(10).await.unwrap().is_empty());
    assert!(store.history(10).await.unwrap().is_empty());
}
