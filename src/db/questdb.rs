//! QuestDB persistence for scored candidates.
//!
//! One scan cycle is written inside a single transaction so readers never
//! observe a half-written cycle. Score reasons and component breakdowns go
//! in as JSON strings for audit queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};

use crate::config;
use crate::db::CandidateStore;
use crate::error::ScanError;
use crate::models::{Advisory, Candidate, ScoreResult};

pub struct QuestDatabase {
    client: Mutex<Client>,
}

impl QuestDatabase {
    pub async fn new() -> Result<Self, ScanError> {
        let questdb_url = config::get_questdb_url();
        let (client, connection) = tokio_postgres::connect(&questdb_url, NoTls)
            .await
            .map_err(|e| ScanError::fatal(format!("failed to connect to QuestDB: {}", e)))?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client: Mutex::new(client),
        };
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), ScanError> {
        let client = self.client.lock().await;
        // QuestDB syntax: TIMESTAMP must be first, PARTITION BY comes after
        client
            .execute(
                "CREATE TABLE IF NOT EXISTS candidates (
                    cycle_ts TIMESTAMP,
                    symbol SYMBOL,
                    price DOUBLE,
                    volume DOUBLE,
                    rsi DOUBLE,
                    momentum DOUBLE,
                    volume_spike BOOLEAN,
                    support DOUBLE,
                    resistance DOUBLE,
                    float_percent DOUBLE,
                    short_percent DOUBLE,
                    total_score DOUBLE,
                    is_top_pick BOOLEAN,
                    reasons_json STRING,
                    components_json STRING,
                    advisory_action SYMBOL,
                    advisory_rationale STRING,
                    advisory_price_target DOUBLE
                ) TIMESTAMP(cycle_ts) PARTITION BY DAY",
                &[],
            )
            .await
            .map_err(|e| ScanError::fatal(format!("failed to create candidates table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl CandidateStore for QuestDatabase {
    async fn insert_cycle(
        &self,
        candidates: &[Candidate],
        cycle_ts: DateTime<Utc>,
    ) -> Result<(), ScanError> {
        let mut client = self.client.lock().await;
        let tx = client
            .transaction()
            .await
            .map_err(|e| ScanError::fatal(format!("failed to open transaction: {}", e)))?;

        let cycle_naive = cycle_ts.naive_utc();
        for candidate in candidates {
            let reasons_json = serde_json::to_string(&candidate.score.reasons)
                .map_err(|e| ScanError::fatal(format!("failed to serialize reasons: {}", e)))?;
            let components_json = serde_json::to_string(&candidate.score.components)
                .map_err(|e| ScanError::fatal(format!("failed to serialize components: {}", e)))?;
            let advisory_action = candidate.advisory.as_ref().map(|a| a.action.to_string());
            let advisory_rationale = candidate.advisory.as_ref().map(|a| a.rationale.clone());
            let advisory_target = candidate.advisory.as_ref().and_then(|a| a.price_target);

            tx.execute(
                "INSERT INTO candidates (cycle_ts, symbol, price, volume, rsi, momentum, \
                 volume_spike, support, resistance, float_percent, short_percent, total_score, \
                 is_top_pick, reasons_json, components_json, advisory_action, \
                 advisory_rationale, advisory_price_target)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
                &[
                    &cycle_naive,
                    &candidate.symbol,
                    &candidate.price,
                    &candidate.volume,
                    &candidate.rsi,
                    &candidate.momentum,
                    &candidate.volume_spike,
                    &candidate.support,
                    &candidate.resistance,
                    &candidate.float_percent,
                    &candidate.short_percent,
                    &candidate.score.total_score,
                    &candidate.score.is_top_pick,
                    &reasons_json,
                    &components_json,
                    &advisory_action,
                    &advisory_rationale,
                    &advisory_target,
                ],
            )
            .await
            .map_err(|e| {
                ScanError::fatal(format!(
                    "failed to store candidate {}: {}",
                    candidate.symbol, e
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| ScanError::fatal(format!("failed to commit cycle: {}", e)))?;

        Ok(())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Candidate>, ScanError> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                &format!(
                    "SELECT cycle_ts, symbol, price, volume, rsi, momentum, volume_spike, \
                     support, resistance, float_percent, short_percent, total_score, \
                     is_top_pick, reasons_json, components_json, advisory_action, \
                     advisory_rationale, advisory_price_target
                     FROM candidates
                     WHERE cycle_ts = (SELECT max(cycle_ts) FROM candidates)
                     ORDER BY total_score DESC
                     LIMIT {}",
                    limit
                ),
                &[],
            )
            .await
            .map_err(|e| ScanError::fatal(format!("failed to query latest cycle: {}", e)))?;

        rows.iter().map(row_to_candidate).collect()
    }

    async fn history(&self, limit: usize) -> Result<Vec<Candidate>, ScanError> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                &format!(
                    "SELECT cycle_ts, symbol, price, volume, rsi, momentum, volume_spike, \
                     support, resistance, float_percent, short_percent, total_score, \
                     is_top_pick, reasons_json, components_json, advisory_action, \
                     advisory_rationale, advisory_price_target
                     FROM candidates
                     ORDER BY cycle_ts DESC, total_score DESC
                     LIMIT {}",
                    limit
                ),
                &[],
            )
            .await
            .map_err(|e| ScanError::fatal(format!("failed to query history: {}", e)))?;

        rows.iter().map(row_to_candidate).collect()
    }
}

fn row_to_candidate(row: &tokio_postgres::Row) -> Result<Candidate, ScanError> {
    let cycle_naive: chrono::NaiveDateTime = row.get(0);
    let reasons_json: String = row.get(13);
    let components_json: String = row.get(14);
    let reasons = serde_json::from_str(&reasons_json)
        .map_err(|e| ScanError::fatal(format!("corrupt reasons_json: {}", e)))?;
    let components = serde_json::from_str(&components_json)
        .map_err(|e| ScanError::fatal(format!("corrupt components_json: {}", e)))?;

    let advisory_action: Option<String> = row.get(15);
    let advisory = match advisory_action {
        Some(action) => {
            let action = action
                .parse()
                .map_err(|e: String| ScanError::fatal(format!("corrupt advisory row: {}", e)))?;
            Some(Advisory {
                action,
                rationale: row.get::<_, Option<String>>(16).unwrap_or_default(),
                price_target: row.get(17),
            })
        }
        None => None,
    };

    Ok(Candidate {
        symbol: row.get(1),
        price: row.get(2),
        volume: row.get(3),
        rsi: row.get(4),
        momentum: row.get(5),
        volume_spike: row.get(6),
        support: row.get(7),
        resistance: row.get(8),
        float_percent: row.get(9),
        short_percent: row.get(10),
        score: ScoreResult {
            total_score: row.get(11),
            reasons,
            is_top_pick: row.get(12),
            components,
        },
        advisory,
        cycle_ts: DateTime::from_naive_utc_and_offset(cycle_naive, Utc),
    })
}
