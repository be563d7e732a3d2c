//! Persisted trading signals and their broadcast projection

use crate::models::analysis::AnalysisContext;
use crate::models::decision::Decision;
use crate::models::market::MarketSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SIGNAL_ENGINE_TAG: &str = "ai_analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status. Transitions (ACTIVE → EXECUTED | EXPIRED) are separate
/// events; the signal body itself is append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    Active,
    Executed,
    Expired,
}

impl SignalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Executed => "EXECUTED",
            Self::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalFactors {
    pub rsi: f64,
    pub macd_signal: String,
    pub bollinger_position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentFactors {
    pub social_score: f64,
    pub news_score: f64,
    pub activity_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactors {
    pub overall_risk: f64,
    pub liquidity_risk: f64,
    pub volatility_risk: f64,
}

/// Full reasoning payload embedded in the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReasoning {
    pub summary: String,
    pub technical_factors: TechnicalFactors,
    pub sentiment_factors: SentimentFactors,
    pub risk_factors: RiskFactors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMetadata {
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub smart_money_score: f64,
    pub support_level: f64,
    pub resistance_level: f64,
}

/// A risk-gate-approved, directional trading recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub mint: String,
    pub symbol: String,
    pub engine: String,
    pub direction: SignalDirection,
    pub recommendation: crate::models::decision::Recommendation,
    pub confidence: f64,
    pub price: f64,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub time_horizon: String,
    pub reasoning: SignalReasoning,
    pub metadata: SignalMetadata,
    pub status: SignalStatus,
    pub created_at: DateTime<Utc>,
}

impl Signal {
    /// Assemble the persisted record from the cycle's intermediate values.
    pub fn from_decision(
        mint: &str,
        symbol: &str,
        direction: SignalDirection,
        decision: &Decision,
        snapshot: &MarketSnapshot,
        context: &AnalysisContext,
    ) -> Self {
        Self {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
            engine: SIGNAL_ENGINE_TAG.to_string(),
            direction,
            recommendation: decision.recommendation,
            confidence: decision.confidence,
            price: snapshot.price,
            target_price: decision.target_price,
            stop_loss: decision.stop_loss,
            time_horizon: decision.time_horizon.clone(),
            reasoning: SignalReasoning {
                summary: decision.reasoning.clone(),
                technical_factors: TechnicalFactors {
                    rsi: context.technical.rsi,
                    macd_signal: context.technical.macd_signal.clone(),
                    bollinger_position: context.technical.bollinger_position,
                },
                sentiment_factors: SentimentFactors {
                    social_score: context.sentiment.social_score,
                    news_score: context.sentiment.news_score,
                    activity_count: context.sentiment.activity_count,
                },
                risk_factors: RiskFactors {
                    overall_risk: decision.risk_score,
                    liquidity_risk: context.technical.liquidity_risk,
                    volatility_risk: context.technical.volatility_risk,
                },
            },
            metadata: SignalMetadata {
                market_cap: snapshot.market_cap,
                volume_24h: snapshot.volume_24h,
                smart_money_score: context.sentiment.smart_money_score,
                support_level: context.technical.support,
                resistance_level: context.technical.resistance,
            },
            status: SignalStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Reduced flat projection broadcast to subscribers.
    pub fn to_event(&self) -> SignalEvent {
        SignalEvent {
            mint: self.mint.clone(),
            symbol: self.symbol.clone(),
            direction: self.direction,
            recommendation: self.recommendation,
            confidence: self.confidence,
            price: self.price,
            target_price: self.target_price,
            stop_loss: self.stop_loss,
            time_horizon: self.time_horizon.clone(),
            timestamp: self.created_at,
        }
    }
}

/// Flat payload published on the signal topic. Intentionally excludes the
/// full analysis context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub mint: String,
    pub symbol: String,
    pub direction: SignalDirection,
    pub recommendation: crate::models::decision::Recommendation,
    pub confidence: f64,
    pub price: f64,
    pub target_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub time_horizon: String,
    pub timestamp: DateTime<Utc>,
}
