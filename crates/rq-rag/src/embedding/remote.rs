//! Remote feature-extraction embedding backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use rq_core::{EmbeddingProvider, Error, Result};

use crate::config::EmbeddingConfig;

/// Embeds text through a Hugging Face style `pipeline/feature-extraction` endpoint
pub struct RemoteEmbeddingProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

/// Providers answer either with the vector itself or with a batch of one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Flat(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

impl FeatureExtractionResponse {
    fn into_vector(self) -> Result<Vec<f32>> {
        let vector = match self {
            FeatureExtractionResponse::Flat(vector) => vector,
            FeatureExtractionResponse::Batch(mut rows) => {
                if rows.len() != 1 {
                    return Err(Error::EmbeddingUnavailable(format!(
                        "expected a single embedding, provider returned {}",
                        rows.len()
                    )));
                }
                rows.remove(0)
            }
        };

        if vector.is_empty() {
            return Err(Error::EmbeddingUnavailable(
                "provider returned an empty embedding".to_string(),
            ));
        }
        Ok(vector)
    }
}

impl RemoteEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}/pipeline/feature-extraction",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    /// Decode a raw response body into a flat vector
    fn parse_body(body: &str) -> Result<Vec<f32>> {
        serde_json::from_str::<FeatureExtractionResponse>(body)
            .map_err(|e| Error::EmbeddingUnavailable(format!("malformed embedding response: {}", e)))?
            .into_vector()
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("embedding request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("embedding response unreadable: {}", e)))?;

        if !status.is_success() {
            return Err(Error::EmbeddingUnavailable(format!(
                "embedding endpoint returned {}: {}",
                status,
                body.trim()
            )));
        }

        let vector = Self::parse_body(&body)?;
        debug!(model = %self.model, dimensions = vector.len(), "embedded text");
        Ok(vector)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
