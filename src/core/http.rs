//! HTTP trigger and read API using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::CandidateStore;
use crate::metrics::Metrics;
use crate::scanner::{JobRegistry, JobState, Scanner};

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub jobs: Arc<JobRegistry>,
    pub store: Arc<dyn CandidateStore>,
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "squeezescan-scanner"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Trigger a scan cycle. Returns immediately with a job id; the cycle runs
/// in the background and its progress is polled via `/api/scan/{id}`.
async fn trigger_scan(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let job_id = state.jobs.submit().await;
    let tracker = crate::scanner::JobTracker::new(state.jobs.clone(), job_id);
    let scanner = state.scanner.clone();
    tokio::spawn(scanner.run_tracked(tracker));

    info!(job = job_id, "scan cycle triggered");
    (StatusCode::ACCEPTED, Json(json!({ "job_id": job_id })))
}

/// Poll the state of a triggered scan.
async fn scan_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JobState>, StatusCode> {
    state
        .jobs
        .get(id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

/// Candidates from the most recent completed cycle, best score first.
async fn latest_candidates(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Value>, StatusCode> {
    let limit = params.limit.unwrap_or(50);
    let candidates = state.store.latest(limit).await.map_err(|e| {
        error!(error = %e, "Failed to load latest candidates");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(json!(candidates)))
}

/// Candidates across past cycles, newest cycle first.
async fn candidate_history(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Value>, StatusCode> {
    let limit = params.limit.unwrap_or(200);
    let candidates = state.store.history(limit).await.map_err(|e| {
        error!(error = %e, "Failed to load candidate history");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(json!(candidates)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/scan", post(trigger_scan))
        .route("/api/scan/{id}", get(scan_status))
        .route("/api/candidates/latest", get(latest_candidates))
        .route("/api/candidates/history", get(candidate_history))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install shutdown handler");
    }
    info!("shutdown signal received, draining HTTP server");
}
