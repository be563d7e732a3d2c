//! Integration tests for the reasoning-model client
//!
//! Every failure mode must degrade to the canonical safe default; the
//! pipeline never sees an error from this stage.

#[path = "test_utils.rs"]
mod test_utils;

use serde_json::json;
use solpulse::decision::DecisionClient;
use solpulse::models::decision::Recommendation;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::{buy_decision_body, mock_reasoning_model, test_candidate, test_context, test_snapshot};

fn client_for(server: &MockServer) -> DecisionClient {
    DecisionClient::new(server.uri(), "test-key".to_string(), "test-model".to_string())
}

fn assert_safe_default(decision: &solpulse::models::decision::Decision) {
    assert_eq!(decision.recommendation, Recommendation::Hold);
    assert_eq!(decision.confidence, 0.0);
    assert_eq!(decision.risk_score, 1.0);
    assert_eq!(decision.time_horizon, "unknown");
}

#[tokio::test]
async fn conforming_response_is_parsed_into_a_decision() {
    let server = MockServer::start().await;
    mock_reasoning_model(&server, buy_decision_body(0.82, 0.35)).await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_eq!(decision.recommendation, Recommendation::Buy);
    assert_eq!(decision.confidence, 0.82);
    assert_eq!(decision.risk_score, 0.35);
    assert_eq!(decision.target_price, Some(0.05));
}

#[tokio::test]
async fn prompt_serializes_all_indicator_sections() {
    let server = MockServer::start().await;

    // The mock only matches when the prompt carries the indicator sections
    let response = json!({
        "choices": [{ "message": { "content": buy_decision_body(0.7, 0.3).to_string() } }]
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("TECHNICAL INDICATORS"))
        .and(body_string_contains("SOCIAL SENTIMENT"))
        .and(body_string_contains("TOKEN INFORMATION"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&server)
        .await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_eq!(decision.recommendation, Recommendation::Buy);
}

#[tokio::test]
async fn non_json_content_degrades_to_safe_default() {
    let server = MockServer::start().await;

    let response = json!({
        "choices": [{ "message": { "content": "I am unable to analyze this token." } }]
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_safe_default(&decision);
}

#[tokio::test]
async fn http_error_degrades_to_safe_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_safe_default(&decision);
}

#[tokio::test]
async fn unreachable_endpoint_degrades_to_safe_default() {
    let client = DecisionClient::new(
        "http://127.0.0.1:1".to_string(),
        "test-key".to_string(),
        "test-model".to_string(),
    );

    let decision = client
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_safe_default(&decision);
}

#[tokio::test]
async fn out_of_bounds_confidence_degrades_to_safe_default() {
    let server = MockServer::start().await;
    mock_reasoning_model(&server, buy_decision_body(1.7, 0.35)).await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_safe_default(&decision);
}

#[tokio::test]
async fn unknown_recommendation_degrades_to_safe_default() {
    let server = MockServer::start().await;

    let mut body = buy_decision_body(0.8, 0.3);
    body["recommendation"] = json!("APE_IN");
    mock_reasoning_model(&server, body).await;

    let decision = client_for(&server)
        .decide(&test_candidate(), &test_snapshot(), &test_context())
        .await;

    assert_safe_default(&decision);
}
