//! Point-in-time market data for a token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price and market stats for one token at one instant.
///
/// Shared read-only by every consumer within the cache TTL window.
/// A fallback snapshot (both sources unreachable) carries zero values and
/// `is_fallback = true`; downstream consumers treat it as a strong prior
/// toward rejecting any signal for the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub mint: String,
    pub price: f64,
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub change_24h: Option<f64>,
    pub fetched_at: DateTime<Utc>,
    pub is_fallback: bool,
}

impl MarketSnapshot {
    pub fn new(mint: &str, price: f64) -> Self {
        Self {
            mint: mint.to_string(),
            price,
            market_cap: None,
            volume_24h: None,
            change_24h: None,
            fetched_at: Utc::now(),
            is_fallback: false,
        }
    }

    /// Zero-valued snapshot returned when every source failed.
    pub fn fallback(mint: &str) -> Self {
        Self {
            mint: mint.to_string(),
            price: 0.0,
            market_cap: None,
            volume_24h: None,
            change_24h: None,
            fetched_at: Utc::now(),
            is_fallback: true,
        }
    }
}
