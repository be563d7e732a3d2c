//! Cached market snapshot retrieval
//!
//! Cache-first: a snapshot within its TTL is returned without any external
//! call. On a miss the primary price source is queried and the secondary
//! source opportunistically enriches the result; when both fail a zero-valued
//! fallback snapshot is returned rather than an error. Only real snapshots
//! are written through to the cache.

use crate::metrics::Metrics;
use crate::models::market::MarketSnapshot;
use crate::services::pricefeed::PriceFeedClient;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get a market snapshot for a token. Infallible: on total source
    /// failure the returned snapshot has `is_fallback = true`.
    async fn get_snapshot(&self, mint: &str) -> MarketSnapshot;
}

struct CacheEntry {
    snapshot: MarketSnapshot,
    stored_at: Instant,
}

pub struct CachedMarketDataProvider {
    pricefeed: Arc<PriceFeedClient>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl CachedMarketDataProvider {
    pub fn new(pricefeed: Arc<PriceFeedClient>, ttl: Duration) -> Self {
        Self {
            pricefeed,
            cache: RwLock::new(HashMap::new()),
            ttl,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn fetch_snapshot(&self, mint: &str) -> MarketSnapshot {
        match self.pricefeed.fetch_price(mint).await {
            Ok(price) => {
                let mut snapshot = MarketSnapshot::new(mint, price);

                // Enrichment is opportunistic; its failure leaves the
                // partial snapshot intact.
                match self.pricefeed.fetch_dex_stats(mint).await {
                    Ok(stats) => {
                        snapshot.market_cap = stats.market_cap;
                        snapshot.volume_24h = stats.volume_24h;
                        snapshot.change_24h = stats.change_24h;
                    }
                    Err(e) => {
                        debug!(mint = %mint, error = %e, "Secondary enrichment unavailable for {}", mint);
                    }
                }

                snapshot
            }
            Err(primary_err) => {
                // Primary down: the secondary pair data can still price
                // the token.
                match self.pricefeed.fetch_dex_stats(mint).await {
                    Ok(stats) if stats.price.is_some() => {
                        let mut snapshot =
                            MarketSnapshot::new(mint, stats.price.unwrap_or(0.0));
                        snapshot.market_cap = stats.market_cap;
                        snapshot.volume_24h = stats.volume_24h;
                        snapshot.change_24h = stats.change_24h;
                        snapshot
                    }
                    _ => {
                        warn!(
                            mint = %mint,
                            error = %primary_err,
                            "All market data sources failed for {}, returning fallback snapshot",
                            mint
                        );
                        if let Some(ref m) = self.metrics {
                            m.snapshot_fallbacks_total.inc();
                        }
                        MarketSnapshot::fallback(mint)
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for CachedMarketDataProvider {
    async fn get_snapshot(&self, mint: &str) -> MarketSnapshot {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(mint) {
                if entry.stored_at.elapsed() < self.ttl {
                    if let Some(ref m) = self.metrics {
                        m.snapshot_cache_hits_total.inc();
                    }
                    return entry.snapshot.clone();
                }
            }
        }

        if let Some(ref m) = self.metrics {
            m.snapshot_cache_misses_total.inc();
        }

        let mut snapshot = self.fetch_snapshot(mint).await;
        snapshot.fetched_at = Utc::now();

        // Fallback snapshots are never cached: the next cycle should retry
        // the sources instead of reusing a zero-valued entry.
        if !snapshot.is_fallback {
            let mut cache = self.cache.write().await;
            cache.insert(
                mint.to_string(),
                CacheEntry {
                    snapshot: snapshot.clone(),
                    stored_at: Instant::now(),
                },
            );
        }

        snapshot
    }
}
