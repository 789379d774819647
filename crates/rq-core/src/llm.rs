//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Sampling and budget settings for a single completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1024,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GenerationConfig {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Trait for LLM providers (e.g., Groq, OpenAI-compatible endpoints)
///
/// A provider performs one stateless single-turn completion. Any transport
/// error, timeout, rate limit or malformed response must surface as
/// [`crate::Error::GenerationFailed`].
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Complete a single user prompt
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
