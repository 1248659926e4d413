//! One-shot scan from the command line.
//!
//! Runs a single cycle against the configured providers and prints the
//! resulting candidates. Uses the in-memory store unless QuestDB is
//! reachable, so it is safe to run without any infrastructure.

use dotenvy::dotenv;
use squeezescan::config::{self, ScanConfig};
use squeezescan::db::{CandidateStore, MemoryCandidateStore, QuestDatabase};
use squeezescan::logging;
use squeezescan::models::Candidate;
use squeezescan::scanner::Scanner;
use squeezescan::services::advisory::{AdvisoryProvider, OpenAiAdvisory};
use squeezescan::services::market_data::{StaticUniverse, UniverseProvider};
use squeezescan::services::stream::NullQuoteStream;
use squeezescan::services::yahoo::YahooClient;
use squeezescan::subscriptions::SubscriptionSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let scan_config = ScanConfig::from_env();

    let yahoo = Arc::new(YahooClient::new(config::get_quote_api_url()));
    let universe: Arc<dyn UniverseProvider> = if scan_config.static_universe.is_empty() {
        yahoo.clone()
    } else {
        Arc::new(StaticUniverse::new(scan_config.static_universe.clone()))
    };

    let advisory: Option<Arc<dyn AdvisoryProvider>> = match (
        config::get_advisory_url(),
        config::get_advisory_api_key(),
    ) {
        (Some(url), Some(key)) => Some(Arc::new(OpenAiAdvisory::new(
            url,
            key,
            config::get_advisory_model(),
        ))),
        _ => None,
    };

    let store: Arc<dyn CandidateStore> = match QuestDatabase::new().await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            warn!(error = %e, "QuestDB unavailable, results will not be persisted");
            Arc::new(MemoryCandidateStore::new())
        }
    };

    let subscriptions = Arc::new(Mutex::new(SubscriptionSet::new(
        scan_config.subscription_limit,
        Arc::new(NullQuoteStream),
    )));

    let scanner = Scanner::new(
        scan_config,
        universe,
        yahoo,
        advisory,
        store,
        subscriptions,
    );

    let candidates = scanner.run_cycle(None).await?;

    println!("Scan complete: {} candidates", candidates.len());
    println!();
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{}. {}", i + 1, candidate.symbol);
        print_candidate(candidate);
        println!();
    }

    Ok(())
}

fn print_candidate(candidate: &Candidate) {
    println!("  Price: ${:.2}", candidate.price);
    println!(
        "  Score: {:.2}{}",
        candidate.score.total_score,
        if candidate.score.is_top_pick {
            "  [TOP PICK]"
        } else {
            ""
        }
    );
    if let Some(rsi) = candidate.rsi {
        println!("  RSI: {:.1}", rsi);
    }
    if let Some(momentum) = candidate.momentum {
        println!("  Momentum: {:.2}%", momentum * 100.0);
    }
    println!("  Reasons:");
    for (i, reason) in candidate.score.reasons.iter().enumerate() {
        println!("    {}. {}", i + 1, reason);
    }
    if let Some(advisory) = &candidate.advisory {
        println!("  Advisory: {} - {}", advisory.action, advisory.rationale);
        if let Some(target) = advisory.price_target {
            println!("  Price target: ${:.2}", target);
        }
    }
}
