//! Deterministic risk gate
//!
//! Pure threshold filter, independent of the model's self-reported risk
//! narrative. Rejections are a normal outcome, observable through counters
//! and logs only.

use crate::models::analysis::AnalysisContext;
use crate::models::decision::Decision;
use crate::models::market::MarketSnapshot;
use crate::models::signal::{Signal, SignalDirection};
use crate::models::token::TokenCandidate;

/// Why a decision did not become a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// HOLD: nothing to trade. Distinct from a filtered actionable decision.
    NonActionable,
    /// Confidence below the minimum threshold.
    LowConfidence,
    /// Risk score above the maximum threshold.
    HighRisk,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonActionable => "non_actionable",
            Self::LowConfidence => "low_confidence",
            Self::HighRisk => "high_risk",
        }
    }
}

#[derive(Debug)]
pub enum GateOutcome {
    Accepted(Box<Signal>),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy)]
pub struct RiskGate {
    min_confidence: f64,
    max_risk: f64,
}

impl RiskGate {
    pub fn new(min_confidence: f64, max_risk: f64) -> Self {
        Self {
            min_confidence,
            max_risk,
        }
    }

    /// Evaluate a decision. Accepts iff confidence and risk are both within
    /// bounds and the recommendation is actionable.
    pub fn evaluate(
        &self,
        candidate: &TokenCandidate,
        snapshot: &MarketSnapshot,
        context: &AnalysisContext,
        decision: &Decision,
    ) -> GateOutcome {
        if !decision.recommendation.is_actionable() {
            return GateOutcome::Rejected(RejectReason::NonActionable);
        }
        if decision.confidence < self.min_confidence {
            return GateOutcome::Rejected(RejectReason::LowConfidence);
        }
        if decision.risk_score > self.max_risk {
            return GateOutcome::Rejected(RejectReason::HighRisk);
        }

        let direction = if decision.recommendation.is_buy() {
            SignalDirection::Buy
        } else {
            SignalDirection::Sell
        };

        GateOutcome::Accepted(Box::new(Signal::from_decision(
            &candidate.mint,
            &candidate.symbol,
            direction,
            decision,
            snapshot,
            context,
        )))
    }
}
