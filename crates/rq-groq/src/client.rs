//! Groq chat-completion client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use rq_core::{Error, GenerationConfig, LLMProvider, Result};

use crate::config::GroqConfig;

/// Groq client
///
/// Holds one pooled `reqwest::Client` for the lifetime of the process; clone
/// the surrounding `Arc` rather than the client to share it between queries.
pub struct GroqClient {
    config: GroqConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GroqClient {
    /// Model constants
    pub const LLAMA_3_1_8B_INSTANT: &'static str = "llama-3.1-8b-instant";
    pub const LLAMA_3_3_70B_VERSATILE: &'static str = "llama-3.3-70b-versatile";

    /// Create a new Groq client from configuration
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Perform the actual completion request
    async fn perform_completion(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.api_url);

        debug!(
            model = %self.config.model,
            temperature = config.temperature,
            max_tokens = config.max_tokens,
            prompt_chars = prompt.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::GenerationFailed(format!("Groq request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "Groq API returned an error");
            return Err(Error::GenerationFailed(describe_failure(status, &error_text)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::GenerationFailed(format!("malformed Groq response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::GenerationFailed("Groq response contained no completion".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(Error::GenerationFailed(
                "Empty completion from Groq API".to_string(),
            ));
        }

        Ok(content)
    }
}

/// Turn a non-success status and body into a readable cause
fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        format!("Groq rate limit exceeded: {}", detail)
    } else {
        format!("Groq API request failed with status {}: {}", status, detail)
    }
}

#[async_trait]
impl LLMProvider for GroqClient {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        match timeout(config.timeout, self.perform_completion(prompt, config)).await {
            Ok(result) => result,
            Err(_) => Err(Error::GenerationFailed(format!(
                "Groq request timed out after {}s",
                config.timeout.as_secs()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
