//! Integration tests for the ops API server
//!
//! Tests HTTP endpoints, health checks and metrics.

use axum_test::TestServer;
use serde_json::Value;
use solpulse::core::http::{create_router, AppState, HealthStatus};
use solpulse::metrics::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

fn test_server() -> (TestServer, Arc<Metrics>) {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
        database: None,
    };

    let server = TestServer::new(create_router(state)).expect("start test server");
    (server, metrics)
}

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let (server, _) = test_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "solpulse-signal-engine");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let (server, _) = test_server();
    let response = server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(
        body.contains("http_requests_total"),
        "Expected http_requests_total metric"
    );
    assert!(
        body.contains("signals_generated_total"),
        "Expected signals_generated_total metric"
    );
    assert!(
        body.contains("snapshot_cache_hits_total"),
        "Expected snapshot_cache_hits_total metric"
    );
}

#[tokio::test]
async fn metrics_endpoint_tracks_request_count() {
    let (server, metrics) = test_server();

    for _ in 0..3 {
        let _ = server.get("/health").await;
    }

    assert!(metrics.http_requests_total.get() >= 3);
}

#[tokio::test]
async fn signal_listing_requires_a_database() {
    let (server, _) = test_server();
    let response = server.get("/api/signals").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn execution_listing_requires_a_database() {
    let (server, _) = test_server();
    let response = server.get("/api/executions").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn api_server_is_stateless() {
    let (server, _) = test_server();

    let response1 = server.get("/health").await;
    let response2 = server.get("/health").await;

    assert_eq!(response1.status_code(), 200);
    assert_eq!(response2.status_code(), 200);
}
