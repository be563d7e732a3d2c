//! Unit tests for candidate selection merging

use solpulse::models::token::{DiscoverySource, TokenCandidate};
use solpulse::services::universe::merge_candidates;

fn ranked(mint: &str, symbol: &str, volume: f64) -> TokenCandidate {
    TokenCandidate {
        mint: mint.to_string(),
        symbol: symbol.to_string(),
        source: DiscoverySource::RankedByVolume,
        volume_24h: Some(volume),
        market_cap: Some(volume * 10.0),
    }
}

fn trending(mint: &str, symbol: &str) -> TokenCandidate {
    TokenCandidate {
        mint: mint.to_string(),
        symbol: symbol.to_string(),
        source: DiscoverySource::TrendingSocial,
        volume_24h: None,
        market_cap: None,
    }
}

#[test]
fn merge_deduplicates_by_mint() {
    let merged = merge_candidates(
        vec![ranked("mint-a", "AAA", 50_000.0), ranked("mint-b", "BBB", 40_000.0)],
        vec![trending("mint-b", "BBB"), trending("mint-c", "CCC")],
        25,
    );

    assert_eq!(merged.len(), 3);
    let mints: Vec<&str> = merged.iter().map(|c| c.mint.as_str()).collect();
    assert_eq!(mints, vec!["mint-a", "mint-b", "mint-c"]);
}

#[test]
fn persisted_stats_entry_wins_on_conflict() {
    let merged = merge_candidates(
        vec![ranked("mint-a", "AAA", 50_000.0)],
        vec![trending("mint-a", "AAA")],
        25,
    );

    assert_eq!(merged.len(), 1);
    // The ranked entry carries the richer fields and must survive
    assert_eq!(merged[0].source, DiscoverySource::RankedByVolume);
    assert_eq!(merged[0].volume_24h, Some(50_000.0));
}

#[test]
fn merge_caps_result_length() {
    let ranked_tokens: Vec<TokenCandidate> = (0..30)
        .map(|i| ranked(&format!("ranked-{}", i), "RNK", 100_000.0 - i as f64))
        .collect();
    let trending_tokens: Vec<TokenCandidate> =
        (0..10).map(|i| trending(&format!("trend-{}", i), "TRD")).collect();

    let merged = merge_candidates(ranked_tokens, trending_tokens, 25);

    assert_eq!(merged.len(), 25);
    // Volume-ranked candidates take priority over trending overflow
    assert!(merged.iter().all(|c| c.source == DiscoverySource::RankedByVolume));
}

#[test]
fn merge_has_no_duplicate_mints_under_cap() {
    let merged = merge_candidates(
        vec![
            ranked("mint-a", "AAA", 1.0),
            ranked("mint-b", "BBB", 2.0),
            ranked("mint-a", "AAA", 3.0),
        ],
        vec![trending("mint-a", "AAA"), trending("mint-c", "CCC")],
        25,
    );

    let mut mints: Vec<&str> = merged.iter().map(|c| c.mint.as_str()).collect();
    mints.sort();
    mints.dedup();
    assert_eq!(mints.len(), merged.len());
}

#[test]
fn trending_only_when_ranked_source_is_empty() {
    let merged = merge_candidates(Vec::new(), vec![trending("mint-c", "CCC")], 25);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].source, DiscoverySource::TrendingSocial);
}

#[test]
fn empty_sources_merge_to_empty() {
    assert!(merge_candidates(Vec::new(), Vec::new(), 25).is_empty());
}
