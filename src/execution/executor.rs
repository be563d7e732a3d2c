//! Trade executor with per-token single-flight protection
//!
//! At most one unresolved execution per token: the in-flight marker is
//! checked and set atomically before dispatch, and released on every
//! resolution path. A second concurrent request fails immediately with
//! `AlreadyInFlight` instead of queuing or duplicating. No automatic
//! retries; retrying is a caller decision.

use crate::db::SignalDatabase;
use crate::execution::{ChainClient, ExecutionError};
use crate::metrics::Metrics;
use crate::models::execution::{ExecutionReceipt, SwapRoute};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct TradeExecutor {
    chain: Arc<dyn ChainClient>,
    in_flight: Mutex<HashSet<String>>,
    database: Option<Arc<SignalDatabase>>,
    metrics: Option<Arc<Metrics>>,
}

impl TradeExecutor {
    pub fn new(chain: Arc<dyn ChainClient>, database: Option<Arc<SignalDatabase>>) -> Self {
        Self {
            chain,
            in_flight: Mutex::new(HashSet::new()),
            database,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Execute a resolved route. `Err` only for the single-flight guard;
    /// a failed submission resolves to a FAILED receipt.
    pub async fn execute(
        &self,
        mint: &str,
        route: SwapRoute,
    ) -> Result<ExecutionReceipt, ExecutionError> {
        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(mint.to_string()) {
                return Err(ExecutionError::AlreadyInFlight(mint.to_string()));
            }
        }

        let result = self.chain.submit_swap(&route).await;

        {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.remove(mint);
        }

        let receipt = match result {
            Ok(signature) => {
                info!(
                    mint = %mint,
                    tx_signature = %signature,
                    "Executed swap for {}",
                    mint
                );
                if let Some(ref m) = self.metrics {
                    m.executions_total.with_label_values(&["success"]).inc();
                }
                ExecutionReceipt::success(mint, route, signature)
            }
            Err(e) => {
                error!(mint = %mint, error = %e, "Swap execution failed for {}", mint);
                if let Some(ref m) = self.metrics {
                    m.executions_total.with_label_values(&["failed"]).inc();
                }
                ExecutionReceipt::failure(mint, route, e.to_string())
            }
        };

        if let Some(ref db) = self.database {
            if let Err(e) = db.store_execution(&receipt).await {
                warn!(mint = %mint, error = %e, "Failed to persist execution receipt");
            }
        }

        Ok(receipt)
    }

    /// Whether an execution for this token is currently unresolved.
    pub async fn is_in_flight(&self, mint: &str) -> bool {
        self.in_flight.lock().await.contains(mint)
    }
}
