//! Technical-analysis collaborator client

use crate::analysis::{AnalysisError, ANALYZER_TIMEOUT};
use crate::models::analysis::TechnicalIndicators;
use serde_json::json;

#[async_trait::async_trait]
pub trait TechnicalAnalyzer: Send + Sync {
    async fn analyze(&self, mint: &str) -> Result<TechnicalIndicators, AnalysisError>;
}

/// HTTP client for the technical-analysis service:
/// `POST /analyze {"mint": ..., "timeframe": "1h"}`.
pub struct HttpTechnicalAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTechnicalAnalyzer {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ANALYZER_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }
}

#[async_trait::async_trait]
impl TechnicalAnalyzer for HttpTechnicalAnalyzer {
    async fn analyze(&self, mint: &str) -> Result<TechnicalIndicators, AnalysisError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "mint": mint, "timeframe": "1h" }))
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
            .json::<TechnicalIndicators>()
            .await
            .map_err(|e| AnalysisError::Malformed(e.to_string()))
    }
}
