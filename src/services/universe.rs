//! Candidate selection: persisted volume ranking merged with the trending
//! feed
//!
//! Failure of either source degrades to a partial result; only an empty
//! merge counts as a cycle-level failure for the scheduler.

use crate::db::SignalDatabase;
use crate::models::token::{DiscoverySource, TokenCandidate};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// How many volume-ranked rows to pull before merging.
const RANKED_FETCH_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum TrendingFeedError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Client for the external trending-token feed: `GET /trending`.
pub struct TrendingFeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrendingFeedClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    pub async fn fetch_trending(&self) -> Result<Vec<TokenCandidate>, TrendingFeedError> {
        let url = format!("{}/trending", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendingFeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrendingFeedError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TrendingFeedError::Malformed(e.to_string()))?;

        let entries = body
            .as_array()
            .ok_or_else(|| TrendingFeedError::Malformed("expected a JSON array".to_string()))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let mint = match entry["mint"].as_str() {
                Some(m) => m.to_string(),
                None => continue,
            };
            let symbol = entry["symbol"].as_str().unwrap_or("UNKNOWN").to_string();

            candidates.push(TokenCandidate {
                mint,
                symbol,
                source: DiscoverySource::TrendingSocial,
                volume_24h: entry["volume24h"].as_f64(),
                market_cap: entry["marketCap"].as_f64(),
            });
        }

        Ok(candidates)
    }
}

/// Merge ranked and trending candidates: dedup by mint with the ranked
/// (persisted-stats) entry winning, ranked ordering first, capped.
pub fn merge_candidates(
    ranked: Vec<TokenCandidate>,
    trending: Vec<TokenCandidate>,
    cap: usize,
) -> Vec<TokenCandidate> {
    let mut merged: Vec<TokenCandidate> = Vec::with_capacity(ranked.len() + trending.len());

    for candidate in ranked.into_iter().chain(trending) {
        if !merged.iter().any(|c| c.mint == candidate.mint) {
            merged.push(candidate);
        }
    }

    merged.truncate(cap);
    merged
}

pub struct TokenUniverseSelector {
    database: Option<Arc<SignalDatabase>>,
    trending: TrendingFeedClient,
    min_volume_24h: f64,
    max_candidates: usize,
}

impl TokenUniverseSelector {
    pub fn new(
        database: Option<Arc<SignalDatabase>>,
        trending: TrendingFeedClient,
        min_volume_24h: f64,
        max_candidates: usize,
    ) -> Self {
        Self {
            database,
            trending,
            min_volume_24h,
            max_candidates,
        }
    }

    /// Select this cycle's candidates. Source failures degrade to a partial
    /// list; an empty result is the caller's cue for the error cooldown.
    pub async fn select(&self) -> Vec<TokenCandidate> {
        let ranked = match &self.database {
            Some(db) => match db.get_top_tokens(self.min_volume_24h, RANKED_FETCH_LIMIT).await {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(error = %e, "Failed to load volume-ranked tokens, continuing with trending feed only");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let trending = match self.trending.fetch_trending().await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Trending feed unavailable, continuing with ranked tokens only");
                Vec::new()
            }
        };

        let candidates = merge_candidates(ranked, trending, self.max_candidates);
        debug!(
            candidate_count = candidates.len(),
            "Selected {} candidates for this cycle",
            candidates.len()
        );

        candidates
    }
}
