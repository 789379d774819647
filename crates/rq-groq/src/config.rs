//! Groq configuration

use serde::{Deserialize, Serialize};

use rq_core::config::{self, EnvLookup, ProcessEnv};
use rq_core::Result;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for the Groq chat-completion client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl GroqConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv::load())
    }

    pub fn from_lookup(env: &impl EnvLookup) -> Result<Self> {
        let api_key = config::required(env, "GROQ_API_KEY")?;
        let api_url = config::endpoint(
            &config::optional(env, "GROQ_API_URL", DEFAULT_API_URL),
            "GROQ_API_URL",
        )?;
        let model = config::optional(env, "LLM_MODEL", DEFAULT_MODEL);

        Ok(Self {
            api_key,
            api_url,
            model,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Copy of this configuration that is safe to print
    pub fn redacted(&self) -> Self {
        Self {
            api_key: config::redact(&self.api_key),
            ..self.clone()
        }
    }
}
