//! Groq integration for RAGQuery
//!
//! This crate provides the Groq implementation of the LLMProvider trait, talking
//! to the OpenAI-compatible chat-completions endpoint.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::GroqClient;
pub use config::GroqConfig;

// Re-export core types for convenience
pub use rq_core::{Error, GenerationConfig, LLMProvider, Result};
