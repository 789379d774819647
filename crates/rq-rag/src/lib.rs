//! Query pipeline for RAGQuery
//!
//! This crate provides the embedding backends, vector index clients, prompt
//! construction and the [`QueryEngine`] that composes them.

pub mod config;
mod embedding;
mod engine;
mod generator;
mod normalizer;
mod qdrant;
mod vector_index;

#[cfg(test)]
mod testing;

pub use config::{
    EmbeddingBackend, EmbeddingConfig, QdrantConfig, QueryConfig, RagConfig,
    TranslationFailurePolicy,
};
#[cfg(feature = "local-embeddings")]
pub use embedding::FastEmbedProvider;
pub use embedding::{RemoteEmbeddingProvider, build_embedding_provider};
pub use engine::QueryEngine;
pub use generator::{
    AnswerGenerator, CONTEXT_DELIMITER, answer_config, build_answer_prompt, build_context,
    build_translation_prompt, translation_config,
};
pub use normalizer::{LanguageNormalizer, NormalizedQuestion};
pub use qdrant::{QdrantIndex, passage_from_payload};
pub use vector_index::InMemoryIndex;

// Re-export core types for convenience
pub use rq_core::{
    AnswerResponse, CollectionInfo, EmbeddingProvider, Error, LLMProvider, QueryRequest, Result,
    RetrievalResponse, RetrievedPassage, VectorIndex,
};
