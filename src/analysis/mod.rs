//! Fan-out to the technical and sentiment analyzers
//!
//! Both collaborators are queried concurrently so total latency is bounded
//! by the slower of the two. Each failure is caught independently and
//! replaced with that half's unavailable() default; the aggregator always
//! yields a complete context.

pub mod sentiment;
pub mod technical;

use crate::metrics::Metrics;
use crate::models::analysis::{AnalysisContext, SentimentSnapshot, TechnicalIndicators};
use crate::models::token::TokenCandidate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub use sentiment::{HttpSentimentAnalyzer, SentimentAnalyzer};
pub use technical::{HttpTechnicalAnalyzer, TechnicalAnalyzer};

/// Default timeout for analyzer calls.
pub(crate) const ANALYZER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub struct AnalysisAggregator {
    technical: Arc<dyn TechnicalAnalyzer>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    metrics: Option<Arc<Metrics>>,
}

impl AnalysisAggregator {
    pub fn new(technical: Arc<dyn TechnicalAnalyzer>, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            technical,
            sentiment,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the analysis context for one candidate.
    pub async fn analyze(&self, candidate: &TokenCandidate) -> AnalysisContext {
        let (technical, sentiment) = tokio::join!(
            self.technical.analyze(&candidate.mint),
            self.sentiment.fetch(&candidate.symbol),
        );

        let technical = technical.unwrap_or_else(|e| {
            warn!(
                mint = %candidate.mint,
                error = %e,
                "Technical analyzer unavailable for {}, using neutral defaults",
                candidate.symbol
            );
            if let Some(ref m) = self.metrics {
                m.analysis_failures_total
                    .with_label_values(&["technical"])
                    .inc();
            }
            TechnicalIndicators::unavailable()
        });

        let sentiment = sentiment.unwrap_or_else(|e| {
            warn!(
                symbol = %candidate.symbol,
                error = %e,
                "Sentiment analyzer unavailable for {}, using zero defaults",
                candidate.symbol
            );
            if let Some(ref m) = self.metrics {
                m.analysis_failures_total
                    .with_label_values(&["sentiment"])
                    .inc();
            }
            SentimentSnapshot::unavailable()
        });

        AnalysisContext {
            technical,
            sentiment,
        }
    }
}
