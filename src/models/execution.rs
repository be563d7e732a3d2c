//! Swap routes and execution receipts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bounded-slippage execution route from the swap aggregator.
/// Ephemeral: fetched immediately before execution, never persisted alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRoute {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub slippage_bps: u32,
    pub price_impact_pct: Option<f64>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionStatus {
    Success,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

/// Outcome of one execution attempt. At most one attempt per token is
/// unresolved at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub mint: String,
    pub route: SwapRoute,
    pub tx_signature: Option<String>,
    pub status: ExecutionStatus,
    pub error: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl ExecutionReceipt {
    pub fn success(mint: &str, route: SwapRoute, tx_signature: String) -> Self {
        Self {
            mint: mint.to_string(),
            route,
            tx_signature: Some(tx_signature),
            status: ExecutionStatus::Success,
            error: None,
            executed_at: Utc::now(),
        }
    }

    pub fn failure(mint: &str, route: SwapRoute, error: String) -> Self {
        Self {
            mint: mint.to_string(),
            route,
            tx_signature: None,
            status: ExecutionStatus::Failed,
            error: Some(error),
            executed_at: Utc::now(),
        }
    }
}
