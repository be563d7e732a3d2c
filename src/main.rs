//! Solpulse Signal Engine
//!
//! Runs the recurring candidate → snapshot → analysis → decision → gate →
//! persist/broadcast → execute pipeline until a shutdown signal arrives.
//! The ops HTTP server runs as a separate process (`cargo run --bin
//! api-server`).

use dotenvy::dotenv;
use solpulse::analysis::{AnalysisAggregator, HttpSentimentAnalyzer, HttpTechnicalAnalyzer};
use solpulse::cache::RedisCache;
use solpulse::config::{EngineConfig, Endpoints};
use solpulse::core::engine::{CycleScheduler, EngineContext};
use solpulse::db::SignalDatabase;
use solpulse::decision::DecisionClient;
use solpulse::execution::{AggregatorChainClient, RouteResolver, TradeExecutor};
use solpulse::logging;
use solpulse::metrics::Metrics;
use solpulse::services::market_data::{CachedMarketDataProvider, MarketDataProvider};
use solpulse::services::pricefeed::PriceFeedClient;
use solpulse::services::universe::{TokenUniverseSelector, TrendingFeedClient};
use solpulse::signals::{RiskGate, SignalPublisher};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let env = solpulse::config::get_environment();
    let config = EngineConfig::from_env();
    let endpoints = Endpoints::from_env();

    info!("Starting Solpulse Signal Engine");
    info!(environment = %env, "Environment");
    info!(
        interval = config.cycle_interval.as_secs(),
        max_candidates = config.max_candidates,
        execution_enabled = config.execution_enabled,
        "Cycle: every {}s, up to {} candidates",
        config.cycle_interval.as_secs(),
        config.max_candidates
    );

    // Initialize metrics
    let metrics = Arc::new(Metrics::new()?);

    // Initialize Postgres (optional: without it, signals are broadcast-only
    // and candidate selection relies on the trending feed)
    info!("Initializing Postgres connection...");
    let database = match SignalDatabase::new().await {
        Ok(db) => {
            info!("Postgres connected");
            metrics.database_connected.set(1.0);
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Postgres - signals will not be persisted");
            None
        }
    };

    // Initialize Redis broadcast channel (optional, best-effort)
    info!("Initializing Redis connection...");
    let bus = match RedisCache::new().await {
        Ok(c) => {
            info!("Redis connected");
            metrics.cache_connected.set(1.0);
            Some(Arc::new(c))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis - signals will not be broadcast");
            None
        }
    };

    // Market data: cache-first provider over the price and dex stats feeds
    let pricefeed = Arc::new(PriceFeedClient::new(
        endpoints.price_api.clone(),
        endpoints.dex_api.clone(),
    ));
    let market_data: Arc<dyn MarketDataProvider> = Arc::new(
        CachedMarketDataProvider::new(pricefeed, config.snapshot_ttl)
            .with_metrics(metrics.clone()),
    );

    // Analysis collaborators
    let analyzer = AnalysisAggregator::new(
        Arc::new(HttpTechnicalAnalyzer::new(endpoints.technical_api.clone())),
        Arc::new(HttpSentimentAnalyzer::new(endpoints.sentiment_api.clone())),
    )
    .with_metrics(metrics.clone());

    // Reasoning model
    let decision = DecisionClient::new(
        endpoints.reasoning_api.clone(),
        endpoints.reasoning_api_key.clone(),
        endpoints.reasoning_model.clone(),
    )
    .with_metrics(metrics.clone());

    let gate = RiskGate::new(config.min_signal_confidence, config.max_risk_score);
    let publisher =
        SignalPublisher::new(database.clone(), bus.clone()).with_metrics(metrics.clone());

    // Execution path
    let router = RouteResolver::new(endpoints.aggregator_api.clone());
    let chain = Arc::new(AggregatorChainClient::new(
        endpoints.aggregator_api.clone(),
        endpoints.wallet_pubkey.clone(),
    ));
    let executor = TradeExecutor::new(chain, database.clone()).with_metrics(metrics.clone());

    // Candidate selection
    let selector = Arc::new(TokenUniverseSelector::new(
        database.clone(),
        TrendingFeedClient::new(endpoints.trending_api.clone()),
        config.min_volume_24h,
        config.max_candidates,
    ));

    let context = Arc::new(EngineContext {
        market_data,
        analyzer,
        decision,
        gate,
        publisher,
        router,
        executor,
        database,
        metrics: Some(metrics),
    });

    // Start the cycle scheduler
    let scheduler = CycleScheduler::new(context, selector, config);
    scheduler.start().await.map_err(|e| format!("Failed to start scheduler: {}", e))?;

    // Graceful shutdown: observed between cycles and between candidates
    info!("Signal engine started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down signal engine...");
            scheduler.stop().await;
            info!("Signal engine stopped");
        }
    }

    Ok(())
}
