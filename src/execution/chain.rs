//! Chain submission seam
//!
//! The executor only consumes a transaction identifier or an error; the
//! signing and submission mechanics live behind this trait.

use crate::execution::ExecutionError;
use crate::models::execution::SwapRoute;
use serde_json::json;
use std::time::Duration;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Build, sign and submit the swap described by the route.
    /// Returns the transaction signature.
    async fn submit_swap(&self, route: &SwapRoute) -> Result<String, ExecutionError>;
}

/// Submits swaps through the aggregator's `/swap` endpoint.
pub struct AggregatorChainClient {
    client: reqwest::Client,
    base_url: String,
    wallet_pubkey: String,
}

impl AggregatorChainClient {
    pub fn new(base_url: String, wallet_pubkey: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            wallet_pubkey,
        }
    }
}

#[async_trait::async_trait]
impl ChainClient for AggregatorChainClient {
    async fn submit_swap(&self, route: &SwapRoute) -> Result<String, ExecutionError> {
        let url = format!("{}/swap", self.base_url);
        let payload = json!({
            "quoteResponse": {
                "inputMint": route.input_mint,
                "outputMint": route.output_mint,
                "inAmount": route.in_amount.to_string(),
                "outAmount": route.out_amount.to_string(),
                "slippageBps": route.slippage_bps,
            },
            "userPublicKey": self.wallet_pubkey,
            "wrapAndUnwrapSol": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExecutionError::Submission(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutionError::Submission(format!(
                "swap endpoint returned {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ExecutionError::Submission(e.to_string()))?;

        body["signature"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ExecutionError::Submission("missing signature".to_string()))
    }
}
