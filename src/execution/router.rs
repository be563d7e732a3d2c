//! Swap aggregator quote client
//!
//! One bounded-latency quote request with a small number of backoff retries
//! on transient failures, then an explicit error. A stuck route request
//! would hold the candidate's single-flight slot, so retries never grow
//! unbounded.

use crate::models::execution::SwapRoute;
use backon::{ExponentialBuilder, Retryable};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_MIN_DELAY: Duration = Duration::from_millis(250);
const MAX_RETRIES: usize = 2;
/// How long a returned quote is considered usable.
const QUOTE_VALIDITY_SECS: i64 = 30;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed quote: {0}")]
    Malformed(String),
}

impl RouteError {
    /// Transient failures are worth a bounded retry; client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

pub struct RouteResolver {
    client: reqwest::Client,
    base_url: String,
}

impl RouteResolver {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    /// Resolve a bounded-slippage route for the given swap.
    pub async fn resolve(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        max_slippage_bps: u32,
    ) -> Result<SwapRoute, RouteError> {
        (|| async { self.fetch_quote(input_mint, output_mint, amount, max_slippage_bps).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(RETRY_MIN_DELAY)
                    .with_max_times(MAX_RETRIES),
            )
            .when(RouteError::is_transient)
            .notify(|err: &RouteError, dur: Duration| {
                warn!(
                    input_mint = %input_mint,
                    output_mint = %output_mint,
                    error = %err,
                    "Route quote failed, retrying in {:?}",
                    dur
                );
            })
            .await
    }

    async fn fetch_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        slippage_bps: u32,
    ) -> Result<SwapRoute, RouteError> {
        let url = format!("{}/quote", self.base_url);
        let params = [
            ("inputMint", input_mint.to_string()),
            ("outputMint", output_mint.to_string()),
            ("amount", amount.to_string()),
            ("slippageBps", slippage_bps.to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| RouteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let quote: Value = response
            .json()
            .await
            .map_err(|e| RouteError::Malformed(e.to_string()))?;

        parse_quote(&quote, slippage_bps)
    }
}

fn parse_quote(quote: &Value, slippage_bps: u32) -> Result<SwapRoute, RouteError> {
    let input_mint = quote["inputMint"]
        .as_str()
        .ok_or_else(|| RouteError::Malformed("missing inputMint".to_string()))?
        .to_string();
    let output_mint = quote["outputMint"]
        .as_str()
        .ok_or_else(|| RouteError::Malformed("missing outputMint".to_string()))?
        .to_string();

    // Amounts come back as decimal strings.
    let in_amount = quote["inAmount"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| RouteError::Malformed("missing inAmount".to_string()))?;
    let out_amount = quote["outAmount"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| RouteError::Malformed("missing outAmount".to_string()))?;

    let price_impact_pct = quote["priceImpactPct"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| quote["priceImpactPct"].as_f64());

    Ok(SwapRoute {
        input_mint,
        output_mint,
        in_amount,
        out_amount,
        slippage_bps,
        price_impact_pct,
        expires_at: Utc::now() + ChronoDuration::seconds(QUOTE_VALIDITY_SECS),
    })
}
