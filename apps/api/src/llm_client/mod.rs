/// LLM Client — the single point of entry for all generation backend calls.
///
/// ARCHITECTURAL RULE: No other module may call the backend directly.
/// All LLM interactions MUST go through this module.
///
/// The backend speaks the Ollama `/api/generate` contract: the model's text
/// comes back as a string field inside a JSON envelope, so every reply is
/// parsed twice.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

#[cfg(test)]
pub(crate) mod fake;

/// Upper bound on one backend call, connection through last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
/// How much of an unparseable reply is quoted back in the error message.
pub const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Could not connect to Ollama at {endpoint}. Please ensure Ollama is running.")]
    Connection { endpoint: String },

    #[error("Ollama API request timed out. The model '{model}' might be taking too long.")]
    Timeout { model: String },

    #[error("API request error: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(
        "Failed to parse JSON response from Ollama. The model may have returned improperly formatted text.\n\
         Error: {source}\n\nModel Output Preview:\n---\n{preview}..."
    )]
    ResponseFormat {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

/// Anything that can turn a prompt into a parsed JSON reply.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so handlers never depend
/// on the concrete HTTP client.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Value, GenerationError>;

    /// Model identifier, for status and log output.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

/// The outer reply envelope. Only `response` is required by the pipeline;
/// the rest is logged when present.
#[derive(Debug, Deserialize)]
struct GenerateEnvelope {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    total_duration: Option<u64>,
}

/// HTTP client for an Ollama-compatible generation backend.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(endpoint: String, model: String) -> reqwest::Result<Self> {
        Self::with_timeout(endpoint, model, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: String, model: String, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
            model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the prompt and returns the backend's raw generated text.
    /// Exactly one attempt; no retries.
    async fn call(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = response.error_for_status().map_err(|e| self.classify(e))?;
        let raw = response.text().await.map_err(|e| self.classify(e))?;

        let envelope: GenerateEnvelope = serde_json::from_str(&raw).map_err(|e| {
            warn!("Backend returned a non-JSON envelope: {e}");
            GenerationError::Request(Box::new(e))
        })?;

        debug!(
            "Generation call succeeded: eval_count={:?}, total_duration_ns={:?}",
            envelope.eval_count, envelope.total_duration
        );

        Ok(envelope.response.unwrap_or_default())
    }

    fn classify(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            warn!("Generation call to model '{}' timed out", self.model);
            GenerationError::Timeout {
                model: self.model.clone(),
            }
        } else if err.is_connect() {
            warn!("Could not connect to generation backend at {}", self.endpoint);
            GenerationError::Connection {
                endpoint: self.endpoint.clone(),
            }
        } else {
            warn!("Generation request failed: {err}");
            GenerationError::Request(Box::new(err))
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<Value, GenerationError> {
        info!(
            "Calling model '{}' ({} prompt chars)",
            self.model,
            prompt.chars().count()
        );
        let text = self.call(prompt).await?;
        parse_generated(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Parses the model's generated text as JSON. On failure the error carries a
/// bounded preview of the text.
pub fn parse_generated(text: &str) -> Result<Value, GenerationError> {
    serde_json::from_str(text).map_err(|source| {
        warn!("Model output was not valid JSON: {source}");
        GenerationError::ResponseFormat {
            source,
            preview: preview(text),
        }
    })
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
