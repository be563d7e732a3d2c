//! Postgres operations for signals, token stats and execution receipts

use crate::config;
use crate::models::execution::{ExecutionReceipt, ExecutionStatus, SwapRoute};
use crate::models::signal::{Signal, SignalStatus};
use crate::models::token::{DiscoverySource, TokenCandidate};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

pub struct SignalDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl SignalDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let database_url = config::get_database_url();
        let (client, connection) =
            tokio_postgres::connect(&database_url, NoTls)
                .await
                .map_err(|e| {
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        format!("Failed to connect to Postgres: {}", e),
                    )) as Box<dyn std::error::Error + Send + Sync>
                })?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Postgres connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        // Initialize schema
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            // Signals are append-only; status transitions touch only the
            // status column, never the record body.
            c.execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    id BIGINT PRIMARY KEY,
                    mint TEXT NOT NULL,
                    symbol TEXT NOT NULL,
                    engine TEXT NOT NULL,
                    direction TEXT NOT NULL,
                    recommendation TEXT NOT NULL,
                    confidence DOUBLE PRECISION NOT NULL,
                    price DOUBLE PRECISION NOT NULL,
                    target_price DOUBLE PRECISION,
                    stop_loss DOUBLE PRECISION,
                    time_horizon TEXT NOT NULL,
                    reasoning_json TEXT NOT NULL,
                    metadata_json TEXT NOT NULL,
                    status TEXT NOT NULL,
                    created_at TIMESTAMP NOT NULL
                )",
                &[],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to create signals table: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            // Written by the market-stats ingestion service; read here for
            // candidate selection.
            c.execute(
                "CREATE TABLE IF NOT EXISTS token_stats (
                    mint TEXT PRIMARY KEY,
                    symbol TEXT NOT NULL,
                    volume_24h DOUBLE PRECISION NOT NULL,
                    market_cap DOUBLE PRECISION,
                    updated_at TIMESTAMP NOT NULL
                )",
                &[],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to create token_stats table: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            c.execute(
                "CREATE TABLE IF NOT EXISTS executions (
                    mint TEXT NOT NULL,
                    input_mint TEXT NOT NULL,
                    output_mint TEXT NOT NULL,
                    in_amount BIGINT NOT NULL,
                    out_amount BIGINT NOT NULL,
                    slippage_bps INT NOT NULL,
                    tx_signature TEXT,
                    status TEXT NOT NULL,
                    error TEXT,
                    executed_at TIMESTAMP NOT NULL
                )",
                &[],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to create executions table: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;
        }

        Ok(())
    }

    /// Append a signal. Returns the generated id.
    pub async fn store_signal(
        &self,
        signal: &Signal,
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let reasoning_json = serde_json::to_string(&signal.reasoning).map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Failed to serialize reasoning: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;
            let metadata_json = serde_json::to_string(&signal.metadata).map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Failed to serialize metadata: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

            let recommendation = serde_json::to_value(signal.recommendation)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| "HOLD".to_string());

            let id = signal.created_at.timestamp_micros();
            let created_at_naive = signal.created_at.naive_utc();

            c.execute(
                "INSERT INTO signals (id, mint, symbol, engine, direction, recommendation, confidence, price, target_price, stop_loss, time_horizon, reasoning_json, metadata_json, status, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
                &[
                    &id,
                    &signal.mint,
                    &signal.symbol,
                    &signal.engine,
                    &signal.direction.to_string(),
                    &recommendation,
                    &signal.confidence,
                    &signal.price,
                    &signal.target_price,
                    &signal.stop_loss,
                    &signal.time_horizon,
                    &reasoning_json,
                    &metadata_json,
                    &signal.status.as_str(),
                    &created_at_naive,
                ],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!("Failed to store signal: {}", e)))
                    as Box<dyn std::error::Error + Send + Sync>
            })?;

            Ok(id)
        } else {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Database connection not available",
            )))
        }
    }

    /// Get signals, newest first, optionally filtered by symbol
    pub async fn get_signals(
        &self,
        symbol: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Signal>, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let mut query = String::from(
                "SELECT mint, symbol, engine, direction, recommendation, confidence, price, target_price, stop_loss, time_horizon, reasoning_json, metadata_json, status, created_at
                 FROM signals",
            );
            if symbol.is_some() {
                query.push_str(" WHERE symbol = $1");
            }
            query.push_str(" ORDER BY created_at DESC");
            if let Some(limit) = limit {
                query.push_str(&format!(" LIMIT {}", limit));
            }

            let rows = if let Some(sym) = symbol {
                c.query(&query, &[&sym]).await
            } else {
                c.query(&query, &[]).await
            }
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to query signals: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            let mut signals = Vec::new();
            for row in rows {
                signals.push(row_to_signal(&row)?);
            }

            Ok(signals)
        } else {
            Ok(Vec::new())
        }
    }

    /// Transition a signal's lifecycle status. The record body is untouched.
    pub async fn update_signal_status(
        &self,
        id: i64,
        status: SignalStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let rows_affected = c
                .execute(
                    "UPDATE signals SET status = $1 WHERE id = $2",
                    &[&status.as_str(), &id],
                )
                .await
                .map_err(|e| {
                    Box::new(std::io::Error::other(format!(
                        "Failed to update signal status: {}",
                        e
                    ))) as Box<dyn std::error::Error + Send + Sync>
                })?;

            if rows_affected == 0 {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Signal with id {} not found", id),
                )));
            }

            Ok(())
        } else {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Database connection not available",
            )))
        }
    }

    /// Sweep ACTIVE signals older than `max_age` to EXPIRED.
    pub async fn expire_stale_signals(
        &self,
        max_age: Duration,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let cutoff = (Utc::now()
                - ChronoDuration::from_std(max_age).unwrap_or_else(|_| ChronoDuration::hours(1)))
            .naive_utc();

            let expired = c
                .execute(
                    "UPDATE signals SET status = 'EXPIRED'
                     WHERE status = 'ACTIVE' AND created_at < $1",
                    &[&cutoff],
                )
                .await
                .map_err(|e| {
                    Box::new(std::io::Error::other(format!(
                        "Failed to expire signals: {}",
                        e
                    ))) as Box<dyn std::error::Error + Send + Sync>
                })?;

            Ok(expired)
        } else {
            Ok(0)
        }
    }

    /// Top tokens by 24h volume from persisted market stats.
    pub async fn get_top_tokens(
        &self,
        min_volume: f64,
        limit: usize,
    ) -> Result<Vec<TokenCandidate>, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let query = format!(
                "SELECT mint, symbol, volume_24h, market_cap
                 FROM token_stats
                 WHERE volume_24h > $1
                 ORDER BY volume_24h DESC
                 LIMIT {}",
                limit
            );

            let rows = c.query(&query, &[&min_volume]).await.map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to query token stats: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            let mut candidates = Vec::new();
            for row in rows {
                let mint: String = row.get(0);
                let symbol: String = row.get(1);
                let volume_24h: f64 = row.get(2);
                let market_cap: Option<f64> = row.get(3);

                candidates.push(TokenCandidate {
                    mint,
                    symbol,
                    source: DiscoverySource::RankedByVolume,
                    volume_24h: Some(volume_24h),
                    market_cap,
                });
            }

            Ok(candidates)
        } else {
            Ok(Vec::new())
        }
    }

    /// Record one execution attempt.
    pub async fn store_execution(
        &self,
        receipt: &ExecutionReceipt,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let executed_at_naive = receipt.executed_at.naive_utc();
            let in_amount = receipt.route.in_amount as i64;
            let out_amount = receipt.route.out_amount as i64;
            let slippage_bps = receipt.route.slippage_bps as i32;

            c.execute(
                "INSERT INTO executions (mint, input_mint, output_mint, in_amount, out_amount, slippage_bps, tx_signature, status, error, executed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
                &[
                    &receipt.mint,
                    &receipt.route.input_mint,
                    &receipt.route.output_mint,
                    &in_amount,
                    &out_amount,
                    &slippage_bps,
                    &receipt.tx_signature,
                    &receipt.status.as_str(),
                    &receipt.error,
                    &executed_at_naive,
                ],
            )
            .await
            .map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to store execution: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            Ok(())
        } else {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Database connection not available",
            )))
        }
    }

    /// Get execution receipts, newest first
    pub async fn get_executions(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ExecutionReceipt>, Box<dyn std::error::Error + Send + Sync>> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            let mut query = String::from(
                "SELECT mint, input_mint, output_mint, in_amount, out_amount, slippage_bps, tx_signature, status, error, executed_at
                 FROM executions
                 ORDER BY executed_at DESC",
            );
            if let Some(limit) = limit {
                query.push_str(&format!(" LIMIT {}", limit));
            }

            let rows = c.query(&query, &[]).await.map_err(|e| {
                Box::new(std::io::Error::other(format!(
                    "Failed to query executions: {}",
                    e
                ))) as Box<dyn std::error::Error + Send + Sync>
            })?;

            let mut receipts = Vec::new();
            for row in rows {
                let mint: String = row.get(0);
                let input_mint: String = row.get(1);
                let output_mint: String = row.get(2);
                let in_amount: i64 = row.get(3);
                let out_amount: i64 = row.get(4);
                let slippage_bps: i32 = row.get(5);
                let tx_signature: Option<String> = row.get(6);
                let status_str: String = row.get(7);
                let error: Option<String> = row.get(8);
                let executed_at_naive: chrono::NaiveDateTime = row.get(9);
                let executed_at = DateTime::from_naive_utc_and_offset(executed_at_naive, Utc);

                let status = match status_str.as_str() {
                    "SUCCESS" => ExecutionStatus::Success,
                    _ => ExecutionStatus::Failed,
                };

                receipts.push(ExecutionReceipt {
                    mint,
                    route: SwapRoute {
                        input_mint,
                        output_mint,
                        in_amount: in_amount as u64,
                        out_amount: out_amount as u64,
                        slippage_bps: slippage_bps as u32,
                        price_impact_pct: None,
                        expires_at: executed_at,
                    },
                    tx_signature,
                    status,
                    error,
                    executed_at,
                });
            }

            Ok(receipts)
        } else {
            Ok(Vec::new())
        }
    }

    /// Check if the database connection is available
    pub async fn is_available(&self) -> bool {
        let client = self.client.read().await;
        client.is_some()
    }
}

fn row_to_signal(
    row: &tokio_postgres::Row,
) -> Result<Signal, Box<dyn std::error::Error + Send + Sync>> {
    use crate::models::decision::Recommendation;
    use crate::models::signal::{SignalDirection, SignalMetadata, SignalReasoning};

    let mint: String = row.get(0);
    let symbol: String = row.get(1);
    let engine: String = row.get(2);
    let direction_str: String = row.get(3);
    let recommendation_str: String = row.get(4);
    let confidence: f64 = row.get(5);
    let price: f64 = row.get(6);
    let target_price: Option<f64> = row.get(7);
    let stop_loss: Option<f64> = row.get(8);
    let time_horizon: String = row.get(9);
    let reasoning_json: String = row.get(10);
    let metadata_json: String = row.get(11);
    let status_str: String = row.get(12);
    let created_at_naive: chrono::NaiveDateTime = row.get(13);

    let direction = match direction_str.as_str() {
        "BUY" => SignalDirection::Buy,
        _ => SignalDirection::Sell,
    };
    let recommendation: Recommendation =
        serde_json::from_value(serde_json::Value::String(recommendation_str))
            .unwrap_or(Recommendation::Hold);
    let status = match status_str.as_str() {
        "EXECUTED" => SignalStatus::Executed,
        "EXPIRED" => SignalStatus::Expired,
        _ => SignalStatus::Active,
    };

    let reasoning: SignalReasoning = serde_json::from_str(&reasoning_json).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize reasoning: {}", e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let metadata: SignalMetadata = serde_json::from_str(&metadata_json).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to deserialize metadata: {}", e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Signal {
        mint,
        symbol,
        engine,
        direction,
        recommendation,
        confidence,
        price,
        target_price,
        stop_loss,
        time_horizon,
        reasoning,
        metadata,
        status,
        created_at: DateTime::from_naive_utc_and_offset(created_at_naive, Utc),
    })
}
