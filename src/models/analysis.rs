//! Technical and sentiment analysis results

use serde::{Deserialize, Serialize};

/// Indicator snapshot from the technical-analysis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd_signal: String,
    pub bollinger_position: f64,
    pub support: f64,
    pub resistance: f64,
    pub liquidity_risk: f64,
    pub volatility_risk: f64,
}

impl TechnicalIndicators {
    /// Default used when the analyzer is unreachable: neutral indicators,
    /// worst-case risk so the gate leans toward rejection.
    pub fn unavailable() -> Self {
        Self {
            rsi: 50.0,
            macd_signal: "neutral".to_string(),
            bollinger_position: 0.5,
            support: 0.0,
            resistance: 0.0,
            liquidity_risk: 1.0,
            volatility_risk: 1.0,
        }
    }
}

/// Social/sentiment snapshot from the sentiment collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub social_score: f64,
    pub news_score: f64,
    pub activity_count: i64,
    pub influencer_mentions: i64,
    pub smart_money_score: f64,
}

impl SentimentSnapshot {
    /// Default used when the sentiment source is unreachable.
    pub fn unavailable() -> Self {
        Self {
            social_score: 0.0,
            news_score: 0.0,
            activity_count: 0,
            influencer_mentions: 0,
            smart_money_score: 0.0,
        }
    }
}

/// Complete analysis context for one candidate in one cycle.
///
/// Always complete: a failed analyzer half is substituted with its
/// unavailable() default, never left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub technical: TechnicalIndicators,
    pub sentiment: SentimentSnapshot,
}
