//! Prompt construction and LLM calls for translation and answering

use std::time::Duration;
use tracing::debug;

use rq_core::{GenerationConfig, LLMProvider, Result, RetrievedPassage};

/// Separator placed between context passages in the answer prompt
pub const CONTEXT_DELIMITER: &str = "\n\n---\n\n";

/// Short, literal, near-deterministic: queries only, never documents
pub fn translation_config() -> GenerationConfig {
    GenerationConfig::new(0.0, 256).with_timeout(Duration::from_secs(30))
}

/// Thorough answers with some controlled variation
pub fn answer_config() -> GenerationConfig {
    GenerationConfig::new(0.3, 1024).with_timeout(Duration::from_secs(60))
}

/// Wraps an [`LLMProvider`] with the two prompts the pipeline needs
pub struct AnswerGenerator<L: LLMProvider> {
    llm: L,
}

impl<L: LLMProvider> AnswerGenerator<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Single-turn completion with an explicit temperature and output budget
    pub async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String> {
        self.llm
            .complete(prompt, &GenerationConfig::new(temperature, max_output_tokens))
            .await
    }

    /// Translate `text` to English; English input comes back verbatim
    pub async fn translate_to_english(&self, text: &str) -> Result<String> {
        let prompt = build_translation_prompt(text);
        let translated = self.llm.complete(&prompt, &translation_config()).await?;
        let translated = translated.trim().to_string();
        debug!(original = text, translated = %translated, "translated question");
        Ok(translated)
    }

    /// Answer `question` from `passages` only, in the question's language
    pub async fn answer(&self, question: &str, passages: &[RetrievedPassage]) -> Result<String> {
        let prompt = build_answer_prompt(question, passages);
        debug!(passages = passages.len(), prompt_chars = prompt.len(), "generating answer");
        let answer = self.llm.complete(&prompt, &answer_config()).await?;
        Ok(answer.trim().to_string())
    }
}

pub fn build_translation_prompt(text: &str) -> String {
    format!(
        "Translate the following text to English.\n\
        If the text is already in English, return it exactly as written, without any changes.\n\
        Return only the text itself: no explanations, no quotes, no labels.\n\
        \n\
        TEXT: {}",
        text
    )
}

/// Join passages into paged context blocks
pub fn build_context(passages: &[RetrievedPassage]) -> String {
    if passages.is_empty() {
        return "(no relevant passages were found)".to_string();
    }

    passages
        .iter()
        .map(|passage| match passage.page_number {
            Some(page) => format!("[Page {}]\n{}", page, passage.text),
            None => format!("[Page unknown]\n{}", passage.text),
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_DELIMITER)
}

pub fn build_answer_prompt(question: &str, passages: &[RetrievedPassage]) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the provided document context.\n\
        Answer only from the context below; do not use outside knowledge.\n\
        If the context contains warnings, cautions or other safety information relevant to the question, include them.\n\
        Answer in the same language as the question.\n\
        If the answer is not in the context, say so explicitly.\n\
        Be concise and direct.\n\
        \n\
        CONTEXT:\n\
        {}\n\
        \n\
        QUESTION: {}\n\
        \n\
        ANSWER:",
        build_context(passages),
        question
    )
}
