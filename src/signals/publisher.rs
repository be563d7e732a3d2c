//! Signal persistence and best-effort broadcast
//!
//! Persistence comes first and is durable; the broadcast is a reduced
//! projection on the signal topic and its failure never rolls back or
//! retries the write.

use crate::cache::{RedisCache, RISK_ALERT_CHANNEL, SIGNAL_CHANNEL};
use crate::db::SignalDatabase;
use crate::metrics::Metrics;
use crate::models::decision::Decision;
use crate::models::signal::Signal;
use crate::models::token::TokenCandidate;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct SignalPublisher {
    database: Option<Arc<SignalDatabase>>,
    bus: Option<Arc<RedisCache>>,
    metrics: Option<Arc<Metrics>>,
}

impl SignalPublisher {
    pub fn new(database: Option<Arc<SignalDatabase>>, bus: Option<Arc<RedisCache>>) -> Self {
        Self {
            database,
            bus,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Persist the signal, then broadcast its reduced projection.
    /// Returns the stored id when a database is configured and the write
    /// succeeded.
    pub async fn persist_and_publish(&self, signal: &Signal) -> Option<i64> {
        let signal_id = match &self.database {
            Some(db) => match db.store_signal(signal).await {
                Ok(id) => {
                    info!(
                        mint = %signal.mint,
                        direction = %signal.direction,
                        confidence = signal.confidence,
                        "Stored {} signal for {} (confidence: {:.2})",
                        signal.direction,
                        signal.symbol,
                        signal.confidence
                    );
                    Some(id)
                }
                Err(e) => {
                    error!(
                        mint = %signal.mint,
                        error = %e,
                        "Failed to persist signal for {}",
                        signal.symbol
                    );
                    None
                }
            },
            None => {
                debug!(mint = %signal.mint, "No database configured, signal not persisted");
                None
            }
        };

        if let Some(ref bus) = self.bus {
            let event = signal.to_event();
            match serde_json::to_string(&event) {
                Ok(payload) => {
                    if let Err(e) = bus.publish(SIGNAL_CHANNEL, &payload).await {
                        warn!(
                            mint = %signal.mint,
                            error = %e,
                            "Failed to broadcast signal for {}",
                            signal.symbol
                        );
                        if let Some(ref m) = self.metrics {
                            m.signal_publish_failures_total.inc();
                        }
                    } else {
                        debug!(mint = %signal.mint, "Broadcasted signal for {}", signal.symbol);
                    }
                }
                Err(e) => {
                    warn!(mint = %signal.mint, error = %e, "Failed to serialize signal event");
                }
            }
        }

        signal_id
    }

    /// Surface a high-risk rejection to operators. Best-effort.
    pub async fn publish_risk_alert(&self, candidate: &TokenCandidate, decision: &Decision) {
        let Some(ref bus) = self.bus else {
            return;
        };

        let payload = json!({
            "mint": candidate.mint,
            "symbol": candidate.symbol,
            "recommendation": decision.recommendation,
            "confidence": decision.confidence,
            "risk_score": decision.risk_score,
            "timestamp": Utc::now(),
        });

        if let Err(e) = bus.publish(RISK_ALERT_CHANNEL, &payload.to_string()).await {
            debug!(mint = %candidate.mint, error = %e, "Failed to publish risk alert");
        }
    }
}
