//! Integration tests for single-flight trade execution

use chrono::Utc;
use solpulse::execution::{ChainClient, ExecutionError, TradeExecutor};
use solpulse::models::execution::{ExecutionStatus, SwapRoute};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

const TEST_MINT: &str = "mintAAAA1111111111111111111111111111111111";

fn test_route() -> SwapRoute {
    SwapRoute {
        input_mint: "So11111111111111111111111111111111111111112".to_string(),
        output_mint: TEST_MINT.to_string(),
        in_amount: 100_000_000,
        out_amount: 2_380_952_380,
        slippage_bps: 100,
        price_impact_pct: Some(0.0012),
        expires_at: Utc::now() + chrono::Duration::seconds(30),
    }
}

/// Chain stub that holds the submission open long enough for a second
/// request to race it.
struct SlowChain {
    delay: Duration,
}

#[async_trait::async_trait]
impl ChainClient for SlowChain {
    async fn submit_swap(&self, _route: &SwapRoute) -> Result<String, ExecutionError> {
        sleep(self.delay).await;
        Ok("5SlowSignature".to_string())
    }
}

struct FailingChain;

#[async_trait::async_trait]
impl ChainClient for FailingChain {
    async fn submit_swap(&self, _route: &SwapRoute) -> Result<String, ExecutionError> {
        Err(ExecutionError::Submission("blockhash expired".to_string()))
    }
}

#[tokio::test]
async fn successful_execution_produces_a_receipt_with_signature() {
    let executor = TradeExecutor::new(
        Arc::new(SlowChain {
            delay: Duration::from_millis(10),
        }),
        None,
    );

    let receipt = executor
        .execute(TEST_MINT, test_route())
        .await
        .expect("execution should resolve");

    assert_eq!(receipt.status, ExecutionStatus::Success);
    assert_eq!(receipt.tx_signature.as_deref(), Some("5SlowSignature"));
    assert!(receipt.error.is_none());
    assert_eq!(receipt.mint, TEST_MINT);
}

#[tokio::test]
async fn second_concurrent_execution_fails_with_already_in_flight() {
    let executor = Arc::new(TradeExecutor::new(
        Arc::new(SlowChain {
            delay: Duration::from_millis(300),
        }),
        None,
    ));

    let first = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute(TEST_MINT, test_route()).await })
    };

    // Let the first request take the in-flight slot
    sleep(Duration::from_millis(50)).await;
    assert!(executor.is_in_flight(TEST_MINT).await);

    let second = executor.execute(TEST_MINT, test_route()).await;
    match second {
        Err(ExecutionError::AlreadyInFlight(mint)) => assert_eq!(mint, TEST_MINT),
        other => panic!("expected AlreadyInFlight, got {:?}", other.map(|r| r.status)),
    }

    // The racing request had no side effects; the first resolves normally
    let receipt = first.await.unwrap().expect("first execution should resolve");
    assert_eq!(receipt.status, ExecutionStatus::Success);
    assert!(!executor.is_in_flight(TEST_MINT).await);
}

#[tokio::test]
async fn executions_for_different_tokens_do_not_contend() {
    let executor = Arc::new(TradeExecutor::new(
        Arc::new(SlowChain {
            delay: Duration::from_millis(200),
        }),
        None,
    ));

    let first = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.execute("mint-one", test_route()).await })
    };
    sleep(Duration::from_millis(50)).await;

    let second = executor.execute("mint-two", test_route()).await;
    assert!(second.is_ok());

    assert!(first.await.unwrap().is_ok());
}

#[tokio::test]
async fn failed_submission_records_reason_and_releases_the_marker() {
    let executor = TradeExecutor::new(Arc::new(FailingChain), None);

    let receipt = executor
        .execute(TEST_MINT, test_route())
        .await
        .expect("failure resolves to a receipt, not an error");

    assert_eq!(receipt.status, ExecutionStatus::Failed);
    assert!(receipt.tx_signature.is_none());
    assert!(receipt
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("blockhash expired"));

    // Marker released: the next attempt is not AlreadyInFlight
    assert!(!executor.is_in_flight(TEST_MINT).await);
    let retry = executor.execute(TEST_MINT, test_route()).await;
    assert!(retry.is_ok());
}
