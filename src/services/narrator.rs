//! Optional text-generation collaborator for insight summaries
//!
//! A narrator only rewrites the summary prose. Profile, confidence and the
//! rule lists never depend on it.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PolkadotMetrics, ReputationProfile, ScoreBreakdown, ScoreTier, StellarMetrics};

/// Narrator errors
#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Narrator request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to encode narration context: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Narrator returned status {0}")]
    Status(u16),

    #[error("Narrator returned an empty summary")]
    EmptyResponse,

    #[error("Narrator timed out after {0}ms")]
    Timeout(u64),
}

/// Everything a narrator may use to write a summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationContext {
    pub profile: ReputationProfile,
    pub tier: ScoreTier,
    pub overall_score: u32,
    pub stellar_score: u32,
    pub polkadot_score: u32,
    pub stellar: StellarMetrics,
    pub polkadot: PolkadotMetrics,
    pub breakdown: ScoreBreakdown,
    pub strengths: Vec<String>,
    pub red_flags: Vec<String>,
    /// Deterministic summary, usable as a starting point
    pub template_summary: String,
}

/// Writes summary prose for a scan
#[async_trait::async_trait]
pub trait InsightNarrator: Send + Sync {
    async fn narrate(&self, context: &NarrationContext) -> Result<String, NarratorError>;
}

const SYSTEM_PROMPT: &str = "You write a short (2-3 sentence) plain-language summary of a \
wallet's cross-chain reputation on Stellar and Polkadot. Use only the facts in the JSON \
you are given. Do not invent numbers.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Narrator backed by an OpenAI-compatible chat completions endpoint
pub struct HttpNarrator {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpNarrator {
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, NarratorError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url,
            api_key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl InsightNarrator for HttpNarrator {
    async fn narrate(&self, context: &NarrationContext) -> Result<String, NarratorError> {
        let payload = serde_json::to_string(context)?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: payload,
                },
            ],
            temperature: 0.3,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NarratorError::Status(response.status().as_u16()));
        }

        let parsed: ChatResponse = response.json().await?;
        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if summary.is_empty() {
            return Err(NarratorError::EmptyResponse);
        }

        tracing::debug!(chars = summary.len(), "Narrator produced summary");
        Ok(summary)
    }
}
