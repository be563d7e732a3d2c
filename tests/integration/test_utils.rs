//! Shared helpers for integration tests

use serde_json::json;
use solpulse::models::analysis::{AnalysisContext, SentimentSnapshot, TechnicalIndicators};
use solpulse::models::market::MarketSnapshot;
use solpulse::models::token::{DiscoverySource, TokenCandidate};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const TEST_MINT: &str = "mintAAAA1111111111111111111111111111111111";

#[allow(dead_code)]
pub fn test_candidate() -> TokenCandidate {
    TokenCandidate {
        mint: TEST_MINT.to_string(),
        symbol: "ALPHA".to_string(),
        source: DiscoverySource::RankedByVolume,
        volume_24h: Some(120_000.0),
        market_cap: Some(2_400_000.0),
    }
}

#[allow(dead_code)]
pub fn test_snapshot() -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new(TEST_MINT, 0.042);
    snapshot.market_cap = Some(2_400_000.0);
    snapshot.volume_24h = Some(120_000.0);
    snapshot.change_24h = Some(-1.5);
    snapshot
}

#[allow(dead_code)]
pub fn test_context() -> AnalysisContext {
    AnalysisContext {
        technical: TechnicalIndicators {
            rsi: 42.0,
            macd_signal: "bullish".to_string(),
            bollinger_position: 0.4,
            support: 0.040,
            resistance: 0.048,
            liquidity_risk: 0.2,
            volatility_risk: 0.4,
        },
        sentiment: SentimentSnapshot {
            social_score: 0.55,
            news_score: 0.3,
            activity_count: 180,
            influencer_mentions: 2,
            smart_money_score: 0.6,
        },
    }
}

/// Mount a primary price-feed response carrying prices for the given mints.
#[allow(dead_code)]
pub async fn mock_price_feed(server: &MockServer, mints: &[(&str, f64)]) {
    let mut data = serde_json::Map::new();
    for (mint, price) in mints {
        data.insert((*mint).to_string(), json!({ "price": price }));
    }

    Mock::given(method("GET"))
        .and(path("/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Mount a secondary dex-stats response for any token.
#[allow(dead_code)]
pub async fn mock_dex_stats(server: &MockServer) {
    let response = json!({
        "pairs": [{
            "priceUsd": "0.042",
            "fdv": 2_400_000.0,
            "volume": { "h24": 120_000.0 },
            "priceChange": { "h24": -1.5 }
        }]
    });

    Mock::given(method("GET"))
        .and(path_regex(r"^/latest/dex/tokens/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mount a reasoning-model response with the given decision body.
#[allow(dead_code)]
pub async fn mock_reasoning_model(server: &MockServer, decision_body: serde_json::Value) {
    let response = json!({
        "choices": [{
            "message": { "content": decision_body.to_string() }
        }]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn buy_decision_body(confidence: f64, risk_score: f64) -> serde_json::Value {
    json!({
        "recommendation": "BUY",
        "confidence": confidence,
        "reasoning": "momentum with supportive sentiment",
        "target_price": 0.05,
        "stop_loss": 0.038,
        "time_horizon": "short",
        "risk_score": risk_score,
        "key_factors": ["rsi", "volume"]
    })
}
