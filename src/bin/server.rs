//! SqueezeScan Server
//!
//! Starts the HTTP trigger/read API and, when SCAN_INTERVAL_SECONDS is
//! set, a cron scheduler that runs full scan cycles on that interval.

use dotenvy::dotenv;
use squeezescan::config::{self, ScanConfig};
use squeezescan::core::http::{start_server, AppState, HealthStatus};
use squeezescan::core::scheduler::ScanScheduler;
use squeezescan::db::{CandidateStore, MemoryCandidateStore, QuestDatabase};
use squeezescan::logging;
use squeezescan::metrics::Metrics;
use squeezescan::scanner::{JobRegistry, Scanner};
use squeezescan::services::advisory::{AdvisoryProvider, OpenAiAdvisory};
use squeezescan::services::market_data::{StaticUniverse, UniverseProvider};
use squeezescan::services::stream::{NullQuoteStream, QuoteStream, WebSocketQuoteStream};
use squeezescan::services::yahoo::YahooClient;
use squeezescan::subscriptions::SubscriptionSet;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();
    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let scan_interval: u64 = env::var("SCAN_INTERVAL_SECONDS")
        .ok()
        .and_then(|i| i.parse().ok())
        .unwrap_or(0);

    let environment = config::get_environment();
    let scan_config = ScanConfig::from_env();
    info!("Starting SqueezeScan Server");
    info!(environment = %environment, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let metrics = Arc::new(Metrics::new()?);

    let yahoo = Arc::new(YahooClient::new(config::get_quote_api_url()));
    let universe: Arc<dyn UniverseProvider> = if scan_config.static_universe.is_empty() {
        yahoo.clone()
    } else {
        info!(
            symbols = scan_config.static_universe.len(),
            "Using static universe from SCAN_UNIVERSE"
        );
        Arc::new(StaticUniverse::new(scan_config.static_universe.clone()))
    };

    let advisory: Option<Arc<dyn AdvisoryProvider>> = match (
        config::get_advisory_url(),
        config::get_advisory_api_key(),
    ) {
        (Some(url), Some(key)) => {
            info!(model = %config::get_advisory_model(), "Advisory enrichment enabled");
            Some(Arc::new(OpenAiAdvisory::new(
                url,
                key,
                config::get_advisory_model(),
            )))
        }
        _ => {
            info!("Advisory enrichment disabled (no ADVISORY_URL/ADVISORY_API_KEY)");
            None
        }
    };

    let store: Arc<dyn CandidateStore> = match QuestDatabase::new().await {
        Ok(db) => {
            info!("QuestDB connected");
            metrics.database_connected.set(1.0);
            Arc::new(db)
        }
        Err(e) => {
            warn!(error = %e, "QuestDB unavailable, falling back to in-memory store");
            metrics.database_connected.set(0.0);
            Arc::new(MemoryCandidateStore::new())
        }
    };

    let stream: Arc<dyn QuoteStream> = match config::get_stream_url() {
        Some(url) => match WebSocketQuoteStream::connect(&url) {
            Ok(stream) => {
                info!(url = %url, "Quote stream connected");
                Arc::new(stream)
            }
            Err(e) => {
                warn!(error = %e, "Quote stream unavailable, subscriptions disabled");
                Arc::new(NullQuoteStream)
            }
        },
        None => Arc::new(NullQuoteStream),
    };
    let subscriptions = Arc::new(Mutex::new(
        SubscriptionSet::new(scan_config.subscription_limit, stream).with_metrics(metrics.clone()),
    ));

    let scanner = Arc::new(
        Scanner::new(
            scan_config,
            universe,
            yahoo,
            advisory,
            store.clone(),
            subscriptions,
        )
        .with_metrics(metrics.clone()),
    );

    let scheduler = if scan_interval > 0 {
        let scheduler = ScanScheduler::new(scanner.clone(), scan_interval)?;
        scheduler.start().await;
        info!(interval = scan_interval, "Scheduled scans every {}s", scan_interval);
        Some(scheduler)
    } else {
        info!("Scheduled scans disabled (SCAN_INTERVAL_SECONDS not set)");
        None
    };

    let state = AppState {
        scanner,
        jobs: Arc::new(JobRegistry::new()),
        store,
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
    };

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("Server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            if let Some(scheduler) = &scheduler {
                scheduler.stop().await;
            }
            info!("Server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
