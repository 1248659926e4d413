//! Integration tests for the HTTP API
//!
//! Tests the trigger endpoint, job polling, candidate reads, health,
//! and metrics against fully mocked providers.

#[path = "test_utils.rs"]
mod test_utils;

use serde_json::Value;
use tokio::time::{sleep, Duration};

use test_utils::{
    flat_shape, mock_chart, mock_fundamentals, mock_no_fundamentals, squeeze_shape, TestApp,
};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApp::new(vec![]).await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "squeezescan-scanner");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApp::new(vec![]).await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("scan_cycles_total"));
    assert!(body.contains("http_requests_in_flight"));
}

#[tokio::test]
async fn trigger_returns_job_id_immediately() {
    let app = TestApp::new(vec![]).await;
    let response = app.server.post("/api/scan").await;
    assert_eq!(response.status_code(), 202);

    let body: Value = response.json();
    assert!(body["job_id"].as_u64().is_some());
}

#[tokio::test]
async fn unknown_job_id_is_not_found() {
    let app = TestApp::new(vec![]).await;
    let response = app.server.get("/api/scan/424242").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn triggered_scan_runs_to_done_and_serves_candidates() {
    let app = TestApp::new(vec!["AAA", "BBB"]).await;

    let (squeeze_closes, squeeze_volumes) = squeeze_shape();
    mock_chart(&app.quote_api, "AAA", &squeeze_closes, &squeeze_volumes).await;
    mock_fundamentals(&app.quote_api, "AAA", 5_000_000.0, 50_000_000.0, 1_500_000.0, 6.0).await;

    let (flat_closes, flat_volumes) = flat_shape();
    mock_chart(&app.quote_api, "BBB", &flat_closes, &flat_volumes).await;
    mock_no_fundamentals(&app.quote_api, "BBB").await;

    let trigger: Value = app.server.post("/api/scan").await.json();
    let job_id = trigger["job_id"].as_u64().unwrap();

    let mut state = Value::Null;
    for _ in 0..100 {
        let response = app.server.get(&format!("/api/scan/{}", job_id)).await;
        state = response.json();
        match state["status"].as_str() {
            Some("done") | Some("failed") => break,
            _ => sleep(Duration::from_millis(20)).await,
        }
    }
    assert_eq!(state["status"], "done", "job ended as {:?}", state);

    // AAA clears the squeeze gate; BBB never produces a candidate.
    let candidates = state["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["symbol"], "AAA");

    let latest: Value = app.server.get("/api/candidates/latest").await.json();
    let rows = latest.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["symbol"], "AAA");
    // A deep squeeze setup with heavy short interest scores well past the
    // promotion threshold, so the served row carries the top-pick flag.
    assert!(rows[0]["score"]["total_score"].as_f64().unwrap() >= 8.0);
    assert_eq!(rows[0]["score"]["is_top_pick"], true);
    assert_eq!(candidates[0]["score"]["is_top_pick"], true);
}

#[tokio::test]
async fn latest_respects_limit_parameter() {
    let app = TestApp::new(vec!["AAA", "CCC"]).await;

    let (closes, volumes) = squeeze_shape();
    for symbol in ["AAA", "CCC"] {
        mock_chart(&app.quote_api, symbol, &closes, &volumes).await;
        mock_fundamentals(&app.quote_api, symbol, 5_000_000.0, 50_000_000.0, 1_500_000.0, 6.0)
            .await;
    }

    app.scanner.run_cycle(None).await.unwrap();

    let limited: Value = app
        .server
        .get("/api/candidates/latest")
        .add_query_param("limit", "1")
        .await
        .json();
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn history_accumulates_across_cycles() {
    let app = TestApp::new(vec!["AAA"]).await;

    let (closes, volumes) = squeeze_shape();
    mock_chart(&app.quote_api, "AAA", &closes, &volumes).await;
    mock_fundamentals(&app.quote_api, "AAA", 5_000_000.0, 50_000_000.0, 1_500_000.0, 6.0).await;

    app.scanner.run_cycle(None).await.unwrap();
    app.scanner.run_cycle(None).await.unwrap();

    let history: Value = app.server.get("/api/candidates/history").await.json();
    assert_eq!(history.as_array().unwrap().len(), 2);
}
