//! Redis connection wrapper used for real-time broadcast
//!
//! Persistence never depends on this channel: publishing is best-effort and
//! a failed publish is logged by the caller, not retried.

use crate::config;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Topic for accepted signals (reduced projection).
pub const SIGNAL_CHANNEL: &str = "trading_signals";
/// Topic for high-risk rejections surfaced to operators.
pub const RISK_ALERT_CHANNEL: &str = "risk_alerts";

pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::with_url(&config::get_redis_url()).await
    }

    pub async fn with_url(url: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = redis::Client::open(url).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid Redis URL: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("Failed to connect to Redis: {}", e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        Ok(Self { conn })
    }

    /// Publish a payload on a named topic.
    pub async fn publish(
        &self,
        channel: &str,
        payload: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.conn.clone();
        let _: () = conn.publish(channel, payload).await.map_err(|e| {
            Box::new(std::io::Error::other(format!(
                "Failed to publish on {}: {}",
                channel, e
            ))) as Box<dyn std::error::Error + Send + Sync>
        })?;
        Ok(())
    }

    /// Connectivity check for health reporting.
    pub async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}
