//! Embedding backends
//!
//! Both backends implement [`EmbeddingProvider`]; [`build_embedding_provider`]
//! picks one from configuration so callers never branch on the backend.

#[cfg(feature = "local-embeddings")]
mod local;
mod remote;

use std::sync::Arc;

use rq_core::{EmbeddingProvider, Result};

use crate::config::{EmbeddingBackend, EmbeddingConfig};

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedProvider;
pub use remote::RemoteEmbeddingProvider;

/// Construct the configured embedding backend
pub fn build_embedding_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.backend {
        EmbeddingBackend::Remote => Ok(Arc::new(RemoteEmbeddingProvider::new(config)?)),
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::Local => Ok(Arc::new(FastEmbedProvider::new(&config.model)?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::Local => Err(rq_core::Error::Configuration(
            "EMBEDDING_BACKEND=local requires building with the `local-embeddings` feature"
                .to_string(),
        )),
    }
}
