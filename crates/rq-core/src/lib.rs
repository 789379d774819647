//! Core traits and types for RAGQuery
//!
//! This crate defines the capability-facing interfaces used by the query pipeline:
//! embedding providers, vector indexes and LLM providers, together with the
//! request/response model and the error taxonomy shared by every crate.

pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod types;
pub mod vector_index;


pub use config::{EnvLookup, ProcessEnv, redact};
pub use embedding::EmbeddingProvider;
pub use error::{Error, ErrorClass, Result};
pub use llm::{GenerationConfig, LLMProvider};
pub use types::*;
pub use vector_index::{CollectionInfo, VectorIndex};
