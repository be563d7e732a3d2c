//! Unit tests for the decision contract

use solpulse::models::decision::{Decision, Recommendation};

#[test]
fn safe_default_is_guaranteed_rejectable() {
    let decision = Decision::safe_default("upstream failure");

    assert_eq!(decision.recommendation, Recommendation::Hold);
    assert_eq!(decision.confidence, 0.0);
    assert_eq!(decision.risk_score, 1.0);
    assert_eq!(decision.time_horizon, "unknown");
    assert!(decision.target_price.is_none());
    assert!(decision.stop_loss.is_none());
    assert!(decision.key_factors.is_empty());
    assert_eq!(decision.reasoning, "upstream failure");
}

#[test]
fn recommendation_direction_mapping() {
    assert!(Recommendation::StrongBuy.is_buy());
    assert!(Recommendation::Buy.is_buy());
    assert!(Recommendation::WeakBuy.is_buy());
    assert!(!Recommendation::Hold.is_buy());
    assert!(!Recommendation::WeakSell.is_buy());
    assert!(!Recommendation::Sell.is_buy());
    assert!(!Recommendation::StrongSell.is_buy());
}

#[test]
fn hold_is_the_only_non_actionable_recommendation() {
    assert!(!Recommendation::Hold.is_actionable());
    assert!(Recommendation::StrongBuy.is_actionable());
    assert!(Recommendation::WeakSell.is_actionable());
    assert!(Recommendation::StrongSell.is_actionable());
}

#[test]
fn recommendation_uses_screaming_snake_wire_format() {
    let parsed: Recommendation = serde_json::from_str("\"STRONG_BUY\"").unwrap();
    assert_eq!(parsed, Recommendation::StrongBuy);

    let parsed: Recommendation = serde_json::from_str("\"WEAK_SELL\"").unwrap();
    assert_eq!(parsed, Recommendation::WeakSell);

    assert_eq!(
        serde_json::to_string(&Recommendation::StrongSell).unwrap(),
        "\"STRONG_SELL\""
    );
}

#[test]
fn unknown_recommendation_fails_to_parse() {
    let result: Result<Recommendation, _> = serde_json::from_str("\"TO_THE_MOON\"");
    assert!(result.is_err());
}

#[test]
fn validate_rejects_out_of_bounds_confidence() {
    let mut decision = Decision::safe_default("test");
    decision.confidence = 1.5;
    assert!(decision.validate().is_err());

    decision.confidence = -0.1;
    assert!(decision.validate().is_err());

    decision.confidence = f64::NAN;
    assert!(decision.validate().is_err());
}

#[test]
fn validate_rejects_out_of_bounds_risk_score() {
    let mut decision = Decision::safe_default("test");
    decision.risk_score = 1.01;
    assert!(decision.validate().is_err());

    decision.risk_score = -0.5;
    assert!(decision.validate().is_err());
}

#[test]
fn validate_accepts_boundary_values() {
    let mut decision = Decision::safe_default("test");
    decision.confidence = 0.0;
    decision.risk_score = 1.0;
    assert!(decision.validate().is_ok());

    decision.confidence = 1.0;
    decision.risk_score = 0.0;
    assert!(decision.validate().is_ok());
}
