//! Unit tests for reasoning-model output parsing

use solpulse::decision::{parse_decision, DecisionError};
use solpulse::models::decision::Recommendation;

const VALID_RESPONSE: &str = r#"{
    "recommendation": "BUY",
    "confidence": 0.82,
    "reasoning": "Oversold RSI with rising smart money inflows",
    "target_price": 0.000031,
    "stop_loss": 0.000024,
    "time_horizon": "short",
    "risk_score": 0.35,
    "key_factors": ["rsi", "smart_money"]
}"#;

#[test]
fn parses_a_conforming_response() {
    let decision = parse_decision(VALID_RESPONSE).unwrap();

    assert_eq!(decision.recommendation, Recommendation::Buy);
    assert_eq!(decision.confidence, 0.82);
    assert_eq!(decision.risk_score, 0.35);
    assert_eq!(decision.target_price, Some(0.000031));
    assert_eq!(decision.time_horizon, "short");
    assert_eq!(decision.key_factors.len(), 2);
}

#[test]
fn tolerates_text_wrapped_around_the_json_object() {
    let wrapped = format!("Here is the analysis:\n{}\nLet me know.", VALID_RESPONSE);
    let decision = parse_decision(&wrapped).unwrap();
    assert_eq!(decision.recommendation, Recommendation::Buy);
}

#[test]
fn missing_fields_are_malformed() {
    let result = parse_decision(r#"{"recommendation": "BUY"}"#);
    assert!(matches!(result, Err(DecisionError::Malformed(_))));
}

#[test]
fn unknown_recommendation_is_malformed() {
    let body = VALID_RESPONSE.replace("\"BUY\"", "\"MOON\"");
    let result = parse_decision(&body);
    assert!(matches!(result, Err(DecisionError::Malformed(_))));
}

#[test]
fn out_of_bounds_confidence_is_a_schema_violation() {
    let body = VALID_RESPONSE.replace("0.82", "1.4");
    let result = parse_decision(&body);
    assert!(matches!(result, Err(DecisionError::SchemaViolation(_))));
}

#[test]
fn out_of_bounds_risk_is_a_schema_violation() {
    let body = VALID_RESPONSE.replace("0.35", "-0.2");
    let result = parse_decision(&body);
    assert!(matches!(result, Err(DecisionError::SchemaViolation(_))));
}

#[test]
fn optional_fields_may_be_absent() {
    let body = r#"{
        "recommendation": "SELL",
        "confidence": 0.7,
        "reasoning": "distribution pattern",
        "time_horizon": "medium",
        "risk_score": 0.5
    }"#;

    let decision = parse_decision(body).unwrap();
    assert_eq!(decision.recommendation, Recommendation::Sell);
    assert!(decision.target_price.is_none());
    assert!(decision.stop_loss.is_none());
    assert!(decision.key_factors.is_empty());
}

#[test]
fn non_json_output_is_malformed() {
    let result = parse_decision("I cannot analyze this token right now.");
    assert!(matches!(result, Err(DecisionError::Malformed(_))));
}
