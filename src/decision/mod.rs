//! Reasoning-model decision client
//!
//! Serializes every known indicator into a deterministic prompt and calls an
//! OpenAI-compatible chat-completions endpoint with low temperature and a
//! bounded output size. The response must match the Decision schema exactly;
//! any failure — transport, status, malformed body, schema violation — maps
//! to the canonical safe default (HOLD / confidence 0 / risk 1), never to an
//! error. An ambiguous external judgment is not actionable.

use crate::metrics::Metrics;
use crate::models::analysis::AnalysisContext;
use crate::models::decision::Decision;
use crate::models::market::MarketSnapshot;
use crate::models::token::TokenCandidate;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are an expert cryptocurrency trader and analyst with deep knowledge of Solana DeFi. Provide precise, actionable trading recommendations based on technical analysis, sentiment data, and market conditions. Focus on risk management and realistic price targets.";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 1000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}

pub struct DecisionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    metrics: Option<Arc<Metrics>>,
}

impl DecisionClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            api_key,
            model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Decide on one candidate. Infallible: every failure mode degrades to
    /// `Decision::safe_default`, which the risk gate is guaranteed to filter.
    pub async fn decide(
        &self,
        candidate: &TokenCandidate,
        snapshot: &MarketSnapshot,
        context: &AnalysisContext,
    ) -> Decision {
        match self.request_decision(candidate, snapshot, context).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    mint = %candidate.mint,
                    error = %e,
                    "Reasoning model unavailable for {}, using safe default",
                    candidate.symbol
                );
                if let Some(ref m) = self.metrics {
                    m.decision_failures_total.inc();
                }
                Decision::safe_default(format!("AI analysis failed: {}", e))
            }
        }
    }

    async fn request_decision(
        &self,
        candidate: &TokenCandidate,
        snapshot: &MarketSnapshot,
        context: &AnalysisContext,
    ) -> Result<Decision, DecisionError> {
        let prompt = build_prompt(candidate, snapshot, context);

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "response_format": { "type": "json_object" }
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DecisionError::Timeout
                } else {
                    DecisionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DecisionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DecisionError::Malformed(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| DecisionError::Malformed("missing message content".to_string()))?;

        parse_decision(content)
    }
}

/// Decode and validate the model output against the Decision schema.
pub fn parse_decision(content: &str) -> Result<Decision, DecisionError> {
    // The prompt requests a bare JSON object; trimming to the outer braces
    // stays robust against occasional wrappers.
    let json_start = content.find('{').unwrap_or(0);
    let json_end = content.rfind('}').map(|i| i + 1).unwrap_or(content.len());
    let json_str = &content[json_start..json_end];

    let decision: Decision =
        serde_json::from_str(json_str).map_err(|e| DecisionError::Malformed(e.to_string()))?;

    decision
        .validate()
        .map_err(DecisionError::SchemaViolation)?;

    Ok(decision)
}

/// Deterministic prompt carrying every numeric indicator for the candidate.
fn build_prompt(
    candidate: &TokenCandidate,
    snapshot: &MarketSnapshot,
    context: &AnalysisContext,
) -> String {
    format!(
        "Analyze the following Solana token for trading opportunities:\n\
         \n\
         TOKEN INFORMATION:\n\
         - Symbol: {symbol}\n\
         - Mint: {mint}\n\
         - Current Price: ${price:.8}\n\
         - Market Cap: ${market_cap:.2}\n\
         - 24h Volume: ${volume:.2}\n\
         - 24h Change: {change:.2}%\n\
         \n\
         TECHNICAL INDICATORS:\n\
         - RSI: {rsi:.2}\n\
         - MACD Signal: {macd}\n\
         - Bollinger Position: {bollinger:.2}\n\
         - Support: ${support:.8}\n\
         - Resistance: ${resistance:.8}\n\
         - Liquidity Risk: {liquidity_risk:.2}\n\
         - Volatility Risk: {volatility_risk:.2}\n\
         \n\
         SOCIAL SENTIMENT:\n\
         - Overall Sentiment: {social:.2}\n\
         - News Sentiment: {news:.2}\n\
         - Community Activity: {activity}\n\
         - Influencer Mentions: {influencers}\n\
         - Smart Money Activity: {smart_money:.2}\n\
         \n\
         Provide a trading analysis as a JSON object with exactly these fields:\n\
         - recommendation: one of STRONG_BUY, BUY, WEAK_BUY, HOLD, WEAK_SELL, SELL, STRONG_SELL\n\
         - confidence: number between 0.0 and 1.0\n\
         - reasoning: detailed reasoning text\n\
         - target_price: number or null\n\
         - stop_loss: number or null\n\
         - time_horizon: short, medium or long\n\
         - risk_score: number between 0.0 and 1.0\n\
         - key_factors: array of strings",
        symbol = candidate.symbol,
        mint = candidate.mint,
        price = snapshot.price,
        market_cap = snapshot.market_cap.unwrap_or(0.0),
        volume = snapshot.volume_24h.unwrap_or(0.0),
        change = snapshot.change_24h.unwrap_or(0.0),
        rsi = context.technical.rsi,
        macd = context.technical.macd_signal,
        bollinger = context.technical.bollinger_position,
        support = context.technical.support,
        resistance = context.technical.resistance,
        liquidity_risk = context.technical.liquidity_risk,
        volatility_risk = context.technical.volatility_risk,
        social = context.sentiment.social_score,
        news = context.sentiment.news_score,
        activity = context.sentiment.activity_count,
        influencers = context.sentiment.influencer_mentions,
        smart_money = context.sentiment.smart_money_score,
    )
}
