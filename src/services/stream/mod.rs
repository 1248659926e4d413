//! Live quote stream client.
//!
//! The websocket implementation keeps one long-lived connection in a
//! background task, reconnecting on close, and exposes a latest-quote map.
//! Subscribe/unsubscribe are fire-over-channel commands; the background
//! task replays active subscriptions after a reconnect.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{sleep, Duration};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ScanError;

#[async_trait]
pub trait QuoteStream: Send + Sync {
    async fn subscribe(&self, symbol: &str) -> Result<(), ScanError>;
    async fn unsubscribe(&self, symbol: &str) -> Result<(), ScanError>;
    async fn latest_quote(&self, symbol: &str) -> Option<f64>;
}

enum StreamCommand {
    Subscribe(String),
    Unsubscribe(String),
}

/// Websocket-backed quote stream.
pub struct WebSocketQuoteStream {
    commands: mpsc::Sender<StreamCommand>,
    prices: Arc<RwLock<HashMap<String, f64>>>,
}

#[derive(Debug, Deserialize)]
struct QuoteMessage {
    symbol: String,
    price: f64,
}

impl WebSocketQuoteStream {
    /// Validate the endpoint and spawn the connection task.
    pub fn connect(url: &str) -> Result<Self, ScanError> {
        let endpoint = Url::parse(url).map_err(|e| ScanError::Stream(e.to_string()))?;
        let (tx, rx) = mpsc::channel(64);
        let prices = Arc::new(RwLock::new(HashMap::new()));

        let task_prices = prices.clone();
        tokio::spawn(async move {
            run_connection(endpoint, rx, task_prices).await;
        });

        Ok(Self {
            commands: tx,
            prices,
        })
    }
}

async fn run_connection(
    endpoint: Url,
    mut commands: mpsc::Receiver<StreamCommand>,
    prices: Arc<RwLock<HashMap<String, f64>>>,
) {
    let mut active: Vec<String> = Vec::new();

    loop {
        let stream = match connect_async(endpoint.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                warn!(error = %e, "quote stream connect failed, retrying in 5s");
                sleep(Duration::from_secs(5)).await;
                continue;
            }
        };
        info!(url = %endpoint, "quote stream connected");
        let (mut sink, mut source) = stream.split();

        // Replay subscriptions that predate this connection.
        for symbol in &active {
            let msg = json!({"type": "subscribe", "symbol": symbol}).to_string();
            if let Err(e) = sink.send(Message::Text(msg)).await {
                warn!(symbol = %symbol, error = %e, "resubscribe failed");
            }
        }

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { return };
                    let (kind, symbol) = match &command {
                        StreamCommand::Subscribe(s) => ("subscribe", s.clone()),
                        StreamCommand::Unsubscribe(s) => ("unsubscribe", s.clone()),
                    };
                    match command {
                        StreamCommand::Subscribe(s) => {
                            if !active.contains(&s) {
                                active.push(s);
                            }
                        }
                        StreamCommand::Unsubscribe(s) => active.retain(|sym| sym != &s),
                    }
                    let msg = json!({"type": kind, "symbol": symbol}).to_string();
                    if let Err(e) = sink.send(Message::Text(msg)).await {
                        warn!(error = %e, "quote stream send failed, reconnecting");
                        break;
                    }
                }
                message = source.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<QuoteMessage>(&text) {
                                Ok(quote) => {
                                    prices.write().await.insert(quote.symbol, quote.price);
                                }
                                Err(_) => debug!(raw = %text, "ignoring unrecognized stream message"),
                            }
                        }
                        Some(Ok(Message::Ping(payload))) => {
                            let _ = sink.send(Message::Pong(payload)).await;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!(error = %e, "quote stream read error, reconnecting");
                            break;
                        }
                        None => {
                            warn!("quote stream closed, reconnecting");
                            break;
                        }
                    }
                }
            }
        }

        sleep(Duration::from_secs(5)).await;
    }
}

#[async_trait]
impl QuoteStream for WebSocketQuoteStream {
    async fn subscribe(&self, symbol: &str) -> Result<(), ScanError> {
        self.commands
            .send(StreamCommand::Subscribe(symbol.to_string()))
            .await
            .map_err(|e| ScanError::Stream(e.to_string()))
    }

    async fn unsubscribe(&self, symbol: &str) -> Result<(), ScanError> {
        self.commands
            .send(StreamCommand::Unsubscribe(symbol.to_string()))
            .await
            .map_err(|e| ScanError::Stream(e.to_string()))
    }

    async fn latest_quote(&self, symbol: &str) -> Option<f64> {
        self.prices.read().await.get(symbol).copied()
    }
}

/// No-op stream for deployments without a live quote endpoint.
pub struct NullQuoteStream;

#[async_trait]
impl QuoteStream for NullQuoteStream {
    async fn subscribe(&self, symbol: &str) -> Result<(), ScanError> {
        debug!(symbol = %symbol, "no quote stream configured, subscribe ignored");
        Ok(())
    }

    async fn unsubscribe(&self, _symbol: &str) -> Result<(), ScanError> {
        Ok(())
    }

    async fn latest_quote(&self, _symbol: &str) -> Option<f64> {
        None
    }
}
