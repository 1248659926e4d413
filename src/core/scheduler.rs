//! Cron-based scheduler for recurring scan cycles

use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::ScanError;
use crate::scanner::Scanner;

/// Runs a full scan cycle on a fixed interval. The interval is compiled to
/// a cron expression so runs stay aligned to the clock rather than to the
/// previous run's finish time.
pub struct ScanScheduler {
    scanner: Arc<Scanner>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    /// `interval_seconds` of 0 disables scheduling.
    pub fn new(scanner: Arc<Scanner>, interval_seconds: u64) -> Result<Self, ScanError> {
        if interval_seconds == 0 {
            return Err(ScanError::fatal("scheduler disabled: interval_seconds is 0"));
        }

        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            let minutes = interval_seconds / 60;
            format!("0 */{} * * * *", minutes)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };

        let schedule = Schedule::from_str(&cron_expr)
            .map_err(|e| ScanError::fatal(format!("invalid cron expression '{}': {}", cron_expr, e)))?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "ScanScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            scanner,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) {
        let scanner = self.scanner.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("ScanScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("ScanScheduler: cron tick, running scan cycle");
                match scanner.run_cycle(None).await {
                    Ok(candidates) => {
                        info!(
                            candidates = candidates.len(),
                            "ScanScheduler: cycle finished with {} candidates",
                            candidates.len()
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "ScanScheduler: scan cycle failed");
                    }
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("ScanScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
