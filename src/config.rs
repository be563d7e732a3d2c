//! Environment-based configuration for the signal engine and its services.

use std::env;
use std::time::Duration;

/// Current deployment environment ("production", "sandbox", ...)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

pub fn get_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "host=127.0.0.1 port=5432 user=solpulse dbname=solpulse".to_string())
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Base URLs and credentials for every external collaborator.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Primary price source (Jupiter-style `/price?ids=` API).
    pub price_api: String,
    /// Secondary market-stats source (DexScreener-style pairs API).
    pub dex_api: String,
    /// Trending-token feed.
    pub trending_api: String,
    /// Technical-analysis collaborator.
    pub technical_api: String,
    /// Sentiment-analysis collaborator.
    pub sentiment_api: String,
    /// Reasoning-model endpoint (OpenAI-compatible chat completions).
    pub reasoning_api: String,
    pub reasoning_api_key: String,
    pub reasoning_model: String,
    /// Swap aggregator (quote + swap).
    pub aggregator_api: String,
    /// Wallet public key used for swap transactions.
    pub wallet_pubkey: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            price_api: env_string("PRICE_API_URL", "https://price.jup.ag/v4"),
            dex_api: env_string("DEX_API_URL", "https://api.dexscreener.com"),
            trending_api: env_string("TRENDING_API_URL", "http://127.0.0.1:8090"),
            technical_api: env_string("TECHNICAL_API_URL", "http://127.0.0.1:8091"),
            sentiment_api: env_string("SENTIMENT_API_URL", "http://127.0.0.1:8092"),
            reasoning_api: env_string("REASONING_API_URL", "https://api.openai.com"),
            reasoning_api_key: env_string("REASONING_API_KEY", ""),
            reasoning_model: env_string("REASONING_MODEL", "gpt-4-1106-preview"),
            aggregator_api: env_string("AGGREGATOR_API_URL", "https://quote-api.jup.ag/v6"),
            wallet_pubkey: env_string("WALLET_PUBKEY", ""),
        }
    }
}

/// Tunable thresholds and pacing for the signal engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum model confidence required to emit a signal.
    pub min_signal_confidence: f64,
    /// Maximum risk score allowed for a signal.
    pub max_risk_score: f64,
    /// Cap on candidates analyzed per cycle.
    pub max_candidates: usize,
    /// Minimum 24h volume for persisted-stats candidates.
    pub min_volume_24h: f64,
    /// Nominal delay between cycles.
    pub cycle_interval: Duration,
    /// Shortened delay after a cycle-level error.
    pub error_cooldown: Duration,
    /// Maximum candidate pipelines in flight at once.
    pub max_concurrency: usize,
    /// Market snapshot cache time-to-live.
    pub snapshot_ttl: Duration,
    /// ACTIVE signals older than this are swept to EXPIRED.
    pub signal_max_age: Duration,
    /// Whether accepted signals are routed and executed.
    pub execution_enabled: bool,
    /// Slippage bound passed to the swap aggregator, in basis points.
    pub max_slippage_bps: u32,
    /// Swap input amount in base units of the quote asset.
    pub trade_amount: u64,
    /// Quote asset traded against (wrapped SOL by default).
    pub quote_mint: String,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            min_signal_confidence: env_f64("MIN_SIGNAL_CONFIDENCE", 0.6),
            max_risk_score: env_f64("MAX_RISK_SCORE", 0.8),
            max_candidates: env_usize("MAX_CANDIDATES", 25),
            min_volume_24h: env_f64("MIN_VOLUME_24H", 10_000.0),
            cycle_interval: Duration::from_secs(env_u64("CYCLE_INTERVAL_SECONDS", 60)),
            error_cooldown: Duration::from_secs(env_u64("ERROR_COOLDOWN_SECONDS", 30)),
            max_concurrency: env_usize("MAX_CONCURRENCY", 4),
            snapshot_ttl: Duration::from_secs(env_u64("SNAPSHOT_TTL_SECONDS", 30)),
            signal_max_age: Duration::from_secs(env_u64("SIGNAL_MAX_AGE_SECONDS", 3600)),
            execution_enabled: env_bool("EXECUTION_ENABLED", false),
            max_slippage_bps: env_u64("MAX_SLIPPAGE_BPS", 100) as u32,
            trade_amount: env_u64("TRADE_AMOUNT", 100_000_000),
            quote_mint: env_string(
                "QUOTE_MINT",
                "So11111111111111111111111111111111111111112",
            ),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_signal_confidence: 0.6,
            max_risk_score: 0.8,
            max_candidates: 25,
            min_volume_24h: 10_000.0,
            cycle_interval: Duration::from_secs(60),
            error_cooldown: Duration::from_secs(30),
            max_concurrency: 4,
            snapshot_ttl: Duration::from_secs(30),
            signal_max_age: Duration::from_secs(3600),
            execution_enabled: false,
            max_slippage_bps: 100,
            trade_amount: 100_000_000,
            quote_mint: "So11111111111111111111111111111111111111112".to_string(),
        }
    }
}
