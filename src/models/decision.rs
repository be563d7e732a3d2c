//! Reasoning-model decision contract

use serde::{Deserialize, Serialize};

/// Recommendation vocabulary of the reasoning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    WeakBuy,
    Hold,
    WeakSell,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// BUY-side recommendations; everything else actionable maps to SELL.
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy | Self::WeakBuy)
    }

    /// HOLD is never a tradable signal.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Hold)
    }
}

/// The model's verdict for one candidate. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    pub time_horizon: String,
    pub risk_score: f64,
    #[serde(default)]
    pub key_factors: Vec<String>,
}

impl Decision {
    /// Canonical safe default: HOLD with zero confidence and maximum risk,
    /// guaranteed to be filtered by the gate. Used whenever the reasoning
    /// model fails or returns something outside the contract.
    pub fn safe_default(reason: impl Into<String>) -> Self {
        Self {
            recommendation: Recommendation::Hold,
            confidence: 0.0,
            reasoning: reason.into(),
            target_price: None,
            stop_loss: None,
            time_horizon: "unknown".to_string(),
            risk_score: 1.0,
            key_factors: Vec::new(),
        }
    }

    /// Bounds checks beyond what serde enforces. A violation means the
    /// response is outside the contract and must not be acted on.
    pub fn validate(&self) -> Result<(), String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence out of [0,1]: {}", self.confidence));
        }
        if !self.risk_score.is_finite() || !(0.0..=1.0).contains(&self.risk_score) {
            return Err(format!("risk_score out of [0,1]: {}", self.risk_score));
        }
        Ok(())
    }
}
