//! REST clients for the primary price source and the secondary dex-stats
//! source

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("no data for {0}")]
    NoData(String),
}

impl MarketDataError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Stats pulled from the secondary source (first trading pair of the token).
#[derive(Debug, Clone, Default)]
pub struct DexStats {
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub change_24h: Option<f64>,
}

pub struct PriceFeedClient {
    client: reqwest::Client,
    price_api: String,
    dex_api: String,
}

impl PriceFeedClient {
    pub fn new(price_api: String, dex_api: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            price_api,
            dex_api,
        }
    }

    pub fn with_client(price_api: String, dex_api: String, client: reqwest::Client) -> Self {
        Self {
            client,
            price_api,
            dex_api,
        }
    }

    /// Spot price from the primary source: `GET /price?ids={mint}`.
    pub async fn fetch_price(&self, mint: &str) -> Result<f64, MarketDataError> {
        let url = format!("{}/price", self.price_api);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", mint)])
            .send()
            .await
            .map_err(MarketDataError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        body["data"][mint]["price"]
            .as_f64()
            .or_else(|| body["data"][mint]["price"].as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| MarketDataError::NoData(mint.to_string()))
    }

    /// Market stats from the secondary source:
    /// `GET /latest/dex/tokens/{mint}`. Reads the first listed pair.
    pub async fn fetch_dex_stats(&self, mint: &str) -> Result<DexStats, MarketDataError> {
        let url = format!("{}/latest/dex/tokens/{}", self.dex_api, mint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(MarketDataError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MarketDataError::Malformed(e.to_string()))?;

        let pair = body["pairs"]
            .as_array()
            .and_then(|pairs| pairs.first())
            .ok_or_else(|| MarketDataError::NoData(mint.to_string()))?;

        Ok(DexStats {
            price: pair["priceUsd"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .or_else(|| pair["priceUsd"].as_f64()),
            market_cap: pair["fdv"].as_f64(),
            volume_24h: pair["volume"]["h24"].as_f64(),
            change_24h: pair["priceChange"]["h24"].as_f64(),
        })
    }
}
