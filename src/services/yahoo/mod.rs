//! Yahoo Finance REST client: quotes, daily history, fundamentals, and a
//! predefined screener for the universe.
//!
//! The base URL is injectable so tests can point the client at a mock
//! server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::ScanError;
use crate::models::{Candle, Fundamentals};
use crate::services::market_data::{
    QuoteProvider, QuoteSnapshot, UniverseFilter, UniverseProvider,
};

const HISTORY_RANGE: &str = "3mo";
const HISTORY_INTERVAL: &str = "1d";
const SCREENER_ID: &str = "most_actives";

pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: String) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: String, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    async fn get_json(&self, url: &str, symbol: &str) -> Result<Value, ScanError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::transient(symbol, e))?;

        if !response.status().is_success() {
            return Err(ScanError::transient(
                symbol,
                format!("provider returned {}", response.status()),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ScanError::transient(symbol, e))
    }

    async fn fetch_chart(&self, symbol: &str) -> Result<QuoteSnapshot, ScanError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url, symbol, HISTORY_RANGE, HISTORY_INTERVAL
        );
        let body = self.get_json(&url, symbol).await?;

        let result = body
            .pointer("/chart/result/0")
            .ok_or_else(|| ScanError::validation(symbol, "empty chart result"))?;

        let meta = &result["meta"];
        let mut snapshot = QuoteSnapshot {
            symbol: symbol.to_string(),
            price: meta["regularMarketPrice"].as_f64(),
            prev_close: meta["chartPreviousClose"]
                .as_f64()
                .or_else(|| meta["previousClose"].as_f64()),
            ..Default::default()
        };

        let timestamps: Vec<i64> = result["timestamp"]
            .as_array()
            .map(|a| a.iter().filter_map(|t| t.as_i64()).collect())
            .unwrap_or_default();
        let quote = &result["indicators"]["quote"][0];

        for (i, ts) in timestamps.iter().enumerate() {
            let bar = (
                quote["open"][i].as_f64(),
                quote["high"][i].as_f64(),
                quote["low"][i].as_f64(),
                quote["close"][i].as_f64(),
                quote["volume"][i].as_f64(),
            );
            // Yahoo pads holiday gaps with nulls; skip incomplete bars.
            if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = bar {
                let timestamp: DateTime<Utc> = DateTime::from_timestamp(*ts, 0)
                    .ok_or_else(|| ScanError::validation(symbol, "bad bar timestamp"))?;
                snapshot
                    .history
                    .push(Candle::new(open, high, low, close, volume, timestamp));
            }
        }

        snapshot.volume = snapshot.history.last().map(|c| c.volume);
        Ok(snapshot)
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<(Fundamentals, Option<f64>), ScanError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=defaultKeyStatistics,financialData,price",
            self.base_url, symbol
        );
        let body = self.get_json(&url, symbol).await?;
        let result = match body.pointer("/quoteSummary/result/0") {
            Some(result) => result,
            None => {
                // Fundamentals are optional enrichment; a thin listing
                // without them still gets scored on technicals.
                debug!(symbol = %symbol, "no fundamentals available");
                return Ok((Fundamentals::default(), None));
            }
        };

        let stats = &result["defaultKeyStatistics"];
        let financial = &result["financialData"];
        let price = &result["price"];

        let fundamentals = Fundamentals {
            revenue_growth: raw(&financial["revenueGrowth"]),
            eps_growth: raw(&financial["earningsGrowth"]),
            // Yahoo reports debt/equity as a percentage.
            debt_to_equity: raw(&financial["debtToEquity"]).map(|v| v / 100.0),
            float_shares: raw(&stats["floatShares"]),
            shares_outstanding: raw(&stats["sharesOutstanding"]),
            shares_short: raw(&stats["sharesShort"]),
            days_to_cover: raw(&stats["shortRatio"]),
            news_count: None,
            sentiment: None,
        };
        let premarket_price = raw(&price["preMarketPrice"]);

        Ok((fundamentals, premarket_price))
    }
}

/// Yahoo wraps numeric fields as `{"raw": 1.23, "fmt": "1.23"}`.
fn raw(value: &Value) -> Option<f64> {
    value["raw"].as_f64().or_else(|| value.as_f64())
}

#[async_trait]
impl QuoteProvider for YahooClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot, ScanError> {
        let mut snapshot = self.fetch_chart(symbol).await?;

        match self.fetch_fundamentals(symbol).await {
            Ok((fundamentals, premarket_price)) => {
                snapshot.fundamentals = fundamentals;
                snapshot.premarket_price = premarket_price;
            }
            Err(e) => {
                // Missing fundamentals only weakens the score.
                debug!(symbol = %symbol, error = %e, "fundamentals fetch failed");
            }
        }

        Ok(snapshot)
    }
}

#[async_trait]
impl UniverseProvider for YahooClient {
    async fn universe(&self, filter: &UniverseFilter) -> Result<Vec<String>, ScanError> {
        let count = filter.limit.unwrap_or(100);
        let url = format!(
            "{}/v1/finance/screener/predefined/saved?scrIds={}&count={}",
            self.base_url, SCREENER_ID, count
        );
        let body = self
            .get_json(&url, "universe")
            .await
            .map_err(|e| ScanError::fatal(e))?;

        let quotes = body
            .pointer("/finance/result/0/quotes")
            .and_then(|q| q.as_array())
            .ok_or_else(|| ScanError::fatal("screener returned no quotes"))?;

        let symbols = quotes
            .iter()
            .filter(|q| {
                let price = q["regularMarketPrice"].as_f64();
                let volume = q["regularMarketVolume"].as_f64();
                filter.matches(price, volume)
            })
            .filter_map(|q| q["symbol"].as_str())
            .map(|s| s.to_string())
            .collect();

        Ok(symbols)
    }
}
