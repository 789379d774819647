//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Converts text into a fixed-dimension vector.
///
/// Implementations must be deterministic for a given text and model version
/// and report every backend failure as [`crate::Error::EmbeddingUnavailable`].
/// The dimensionality must match the index being queried; the index enforces
/// that, not the provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Identifier of the embedding model
    fn model_id(&self) -> &str;
}
