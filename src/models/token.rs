//! Candidate tokens selected for analysis

use serde::{Deserialize, Serialize};

/// Where a candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    /// Top of the persisted 24h-volume ranking.
    RankedByVolume,
    /// External trending-token feed.
    TrendingSocial,
}

/// A token picked for one analysis cycle. Immutable once selected;
/// deduplicated by mint before the cycle starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCandidate {
    pub mint: String,
    pub symbol: String,
    pub source: DiscoverySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}
