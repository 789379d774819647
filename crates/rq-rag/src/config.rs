//! Configuration for the query pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rq_core::config::{self, EnvLookup, ProcessEnv};
use rq_core::{Error, Result};

pub const DEFAULT_COLLECTION: &str = "documents";
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_TOP_K: usize = 50;
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_HF_API_URL: &str = "https://router.huggingface.co/hf-inference";

/// Which embedding implementation serves queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// In-process inference (requires the `local-embeddings` feature)
    Local,
    /// Remote feature-extraction API
    Remote,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(EmbeddingBackend::Local),
            "remote" | "api" => Ok(EmbeddingBackend::Remote),
            other => Err(format!("expected 'local' or 'remote', got '{}'", other)),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Local => write!(f, "local"),
            EmbeddingBackend::Remote => write!(f, "remote"),
        }
    }
}

/// What to do when translating the question for retrieval fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationFailurePolicy {
    /// Fail the whole query
    #[default]
    Abort,
    /// Retrieve with the untranslated question
    Fallback,
}

impl FromStr for TranslationFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(TranslationFailurePolicy::Abort),
            "fallback" => Ok(TranslationFailurePolicy::Fallback),
            other => Err(format!("expected 'abort' or 'fallback', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl EmbeddingConfig {
    pub fn remote(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            backend: EmbeddingBackend::Remote,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: Some(api_key.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn local(model: impl Into<String>) -> Self {
        Self {
            backend: EmbeddingBackend::Local,
            model: model.into(),
            api_url: DEFAULT_HF_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Defaults and bounds applied to every query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_collection: String,
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub translation_failure_policy: TranslationFailurePolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_collection: DEFAULT_COLLECTION.to_string(),
            default_top_k: DEFAULT_TOP_K,
            max_top_k: DEFAULT_MAX_TOP_K,
            translation_failure_policy: TranslationFailurePolicy::Abort,
        }
    }
}

/// Everything the pipeline needs apart from the LLM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub qdrant: QdrantConfig,
    pub embedding: EmbeddingConfig,
    pub query: QueryConfig,
}

impl RagConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv::load())
    }

    pub fn from_lookup(env: &impl EnvLookup) -> Result<Self> {
        let qdrant = QdrantConfig {
            url: config::endpoint(&config::required(env, "QDRANT_URL")?, "QDRANT_URL")?,
            api_key: config::lookup(env, "QDRANT_API_KEY"),
            timeout: Duration::from_secs(30),
        };

        let backend: EmbeddingBackend =
            config::parsed(env, "EMBEDDING_BACKEND", EmbeddingBackend::Remote)?;
        let api_key = config::lookup(env, "HF_API_KEY");
        if backend == EmbeddingBackend::Remote && api_key.is_none() {
            return Err(Error::Configuration(
                "HF_API_KEY environment variable not found (required by the remote embedding backend)"
                    .to_string(),
            ));
        }

        let embedding = EmbeddingConfig {
            backend,
            model: config::optional(env, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            api_url: config::endpoint(
                &config::optional(env, "HF_API_URL", DEFAULT_HF_API_URL),
                "HF_API_URL",
            )?,
            api_key,
            timeout: Duration::from_secs(30),
        };

        let query = QueryConfig {
            default_collection: config::optional(env, "COLLECTION_NAME", DEFAULT_COLLECTION),
            default_top_k: config::parsed(env, "TOP_K", DEFAULT_TOP_K)?,
            max_top_k: config::parsed(env, "MAX_TOP_K", DEFAULT_MAX_TOP_K)?,
            translation_failure_policy: config::parsed(
                env,
                "TRANSLATION_FAILURE_POLICY",
                TranslationFailurePolicy::Abort,
            )?,
        };

        if query.default_top_k == 0 || query.default_top_k > query.max_top_k {
            return Err(Error::Configuration(format!(
                "TOP_K must be between 1 and MAX_TOP_K ({}), got {}",
                query.max_top_k, query.default_top_k
            )));
        }

        Ok(Self {
            qdrant,
            embedding,
            query,
        })
    }

    /// Copy of this configuration that is safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.qdrant.api_key = self.qdrant.api_key.as_deref().map(config::redact);
        copy.embedding.api_key = self.embedding.api_key.as_deref().map(config::redact);
        copy
    }
}
