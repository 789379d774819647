//! In-process embedding backend using fastembed (ONNX runtime)

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use rq_core::{EmbeddingProvider, Error, Result};

/// Local sentence-embedding model, loaded on first use and shared afterwards
pub struct FastEmbedProvider {
    model_name: String,
    model: EmbeddingModel,
    engine: OnceCell<Arc<TextEmbedding>>,
}

impl FastEmbedProvider {
    pub fn new(model_name: &str) -> Result<Self> {
        Ok(Self {
            model_name: model_name.to_string(),
            model: Self::resolve_model(model_name)?,
            engine: OnceCell::new(),
        })
    }

    fn resolve_model(name: &str) -> Result<EmbeddingModel> {
        let short = name.rsplit('/').next().unwrap_or(name).to_lowercase();
        match short.as_str() {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            _ => Err(Error::Configuration(format!(
                "embedding model '{}' is not available for local inference",
                name
            ))),
        }
    }

    /// Load the model once; concurrent first callers wait on the same load
    async fn engine(&self) -> Result<Arc<TextEmbedding>> {
        let engine = self
            .engine
            .get_or_try_init(|| async {
                let model = self.model.clone();
                info!(model = %self.model_name, "loading local embedding model");
                let loaded = tokio::task::spawn_blocking(move || {
                    TextEmbedding::try_new(InitOptions::new(model))
                })
                .await
                .map_err(|e| Error::EmbeddingUnavailable(format!("model loader panicked: {}", e)))?
                .map_err(|e| Error::EmbeddingUnavailable(format!("failed to load model: {}", e)))?;
                Ok::<_, Error>(Arc::new(loaded))
            })
            .await?;
        Ok(Arc::clone(engine))
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let engine = self.engine().await?;
        let input = text.to_string();

        let mut vectors = tokio::task::spawn_blocking(move || engine.embed(vec![input], None))
            .await
            .map_err(|e| Error::EmbeddingUnavailable(format!("inference panicked: {}", e)))?
            .map_err(|e| Error::EmbeddingUnavailable(format!("inference failed: {}", e)))?;

        vectors
            .pop()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::EmbeddingUnavailable("model produced no embedding".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.model_name
    }
}
