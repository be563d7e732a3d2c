//! Sentiment/social-monitor collaborator client

use crate::analysis::{AnalysisError, ANALYZER_TIMEOUT};
use crate::models::analysis::SentimentSnapshot;

#[async_trait::async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<SentimentSnapshot, AnalysisError>;
}

/// HTTP client for the social-monitor service: `GET /sentiment/{symbol}`.
pub struct HttpSentimentAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSentimentAnalyzer {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ANALYZER_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }
}

#[async_trait::async_trait]
impl SentimentAnalyzer for HttpSentimentAnalyzer {
    async fn fetch(&self, symbol: &str) -> Result<SentimentSnapshot, AnalysisError> {
        let url = format!("{}/sentiment/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SentimentSnapshot>()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))
    }
}
