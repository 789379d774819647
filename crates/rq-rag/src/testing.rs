//! Test doubles for the pipeline's remote collaborators

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rq_core::{EmbeddingProvider, Error, GenerationConfig, LLMProvider, Result};

/// One recorded completion request
#[derive(Debug, Clone)]
pub struct LlmCall {
    pub prompt: String,
    pub config: GenerationConfig,
}

type Responder = dyn Fn(&str) -> Result<String> + Send + Sync;

/// LLM whose replies are computed from the prompt; records every call
#[derive(Clone)]
pub struct ScriptedLlm {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<LlmCall>>>,
}

impl ScriptedLlm {
    pub fn from_fn(f: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            responder: Arc::new(f),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies in order; runs out with `GenerationFailed`
    pub fn new(replies: Vec<&str>) -> Self {
        let queue: Mutex<VecDeque<String>> =
            Mutex::new(replies.into_iter().map(String::from).collect());
        Self::from_fn(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::GenerationFailed("script exhausted".to_string()))
        })
    }

    /// Translates via a lookup table (echoing unknown text, as for English
    /// input) and answers every answer prompt with `answer`
    pub fn translating(table: &[(&str, &str)], answer: &str) -> Self {
        let table: Vec<(String, String)> = table
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let answer = answer.to_string();

        Self::from_fn(move |prompt| {
            if let Some(text) = translation_input(prompt) {
                let translated = table
                    .iter()
                    .find(|(from, _)| from == text)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| text.to_string());
                Ok(translated)
            } else {
                Ok(answer.clone())
            }
        })
    }

    /// Fails translation prompts, answers everything else
    pub fn failing_translation(answer: &str) -> Self {
        let answer = answer.to_string();
        Self::from_fn(move |prompt| {
            if translation_input(prompt).is_some() {
                Err(Error::GenerationFailed("translation backend down".to_string()))
            } else {
                Ok(answer.clone())
            }
        })
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Text being translated, if `prompt` is a translation prompt
pub fn translation_input(prompt: &str) -> Option<&str> {
    if !prompt.starts_with("Translate the following text to English.") {
        return None;
    }
    prompt.rsplit_once("TEXT: ").map(|(_, text)| text)
}

#[async_trait]
impl LLMProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        self.calls.lock().unwrap().push(LlmCall {
            prompt: prompt.to_string(),
            config: config.clone(),
        });
        (self.responder)(prompt)
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

/// Bag-of-keywords embedder: deterministic, and similar texts score higher
#[derive(Clone)]
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            vocabulary: vec![
                "tire", "pressure", "warning", "light", "brake", "fluid", "oil", "engine",
            ],
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut vector: Vec<f32> = self
            .vocabulary
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect();
        // keeps unrelated text from producing a zero vector
        vector.push(0.1);
        vector
    }

    /// Every text embedded so far, in order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(self.vector_for(text))
    }

    fn model_id(&self) -> &str {
        "keyword"
    }
}

/// Embedder whose backend is always down
pub struct UnavailableEmbedder;

#[async_trait]
impl EmbeddingProvider for UnavailableEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::EmbeddingUnavailable("connection refused".to_string()))
    }

    fn model_id(&self) -> &str {
        "unavailable"
    }
}
