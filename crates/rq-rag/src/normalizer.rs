//! Question normalization for retrieval

use std::fmt;
use std::sync::Arc;
use tracing::warn;

use rq_core::{LLMProvider, Result};

use crate::config::TranslationFailurePolicy;
use crate::generator::AnswerGenerator;

/// English rendition of a question, used only to query the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuestion(String);

impl NormalizedQuestion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Translates questions into the language the corpus was indexed in.
///
/// The caller keeps the original question for answering; only retrieval sees
/// the normalized form.
pub struct LanguageNormalizer<L: LLMProvider> {
    generator: Arc<AnswerGenerator<L>>,
    policy: TranslationFailurePolicy,
}

impl<L: LLMProvider> LanguageNormalizer<L> {
    pub fn new(generator: Arc<AnswerGenerator<L>>, policy: TranslationFailurePolicy) -> Self {
        Self { generator, policy }
    }

    pub async fn normalize_for_retrieval(&self, question: &str) -> Result<NormalizedQuestion> {
        match self.generator.translate_to_english(question).await {
            Ok(english) => Ok(NormalizedQuestion(english)),
            Err(err) if self.policy == TranslationFailurePolicy::Fallback => {
                warn!(error = %err, "translation failed, retrieving with the original question");
                Ok(NormalizedQuestion(question.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedLlm;
    use rq_core::Error;

    fn normalizer(llm: ScriptedLlm, policy: TranslationFailurePolicy) -> LanguageNormalizer<ScriptedLlm> {
        LanguageNormalizer::new(Arc::new(AnswerGenerator::new(llm)), policy)
    }

    #[tokio::test]
    async fn test_english_is_unchanged_and_idempotent() {
        let llm = ScriptedLlm::translating(&[], "unused");
        let normalizer = normalizer(llm, TranslationFailurePolicy::Abort);
        let question = "What does the low tire pressure warning light mean?";

        let once = normalizer.normalize_for_retrieval(question).await.unwrap();
        let twice = normalizer.normalize_for_retrieval(once.as_str()).await.unwrap();

        assert_eq!(once.as_str(), question);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_translates_foreign_question() {
        let llm = ScriptedLlm::translating(
            &[("¿Qué significa la luz de presión baja?", "What does the low pressure light mean?")],
            "unused",
        );
        let normalizer = normalizer(llm, TranslationFailurePolicy::Abort);

        let normalized = normalizer
            .normalize_for_retrieval("¿Qué significa la luz de presión baja?")
            .await
            .unwrap();
        assert_eq!(normalized.to_string(), "What does the low pressure light mean?");
    }

    #[tokio::test]
    async fn test_abort_policy_propagates_failure() {
        let normalizer = normalizer(
            ScriptedLlm::failing_translation("unused"),
            TranslationFailurePolicy::Abort,
        );

        let err = normalizer.normalize_for_retrieval("Hola").await.unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_fallback_policy_keeps_original() {
        let normalizer = normalizer(
            ScriptedLlm::failing_translation("unused"),
            TranslationFailurePolicy::Fallback,
        );

        let normalized = normalizer.normalize_for_retrieval("Hola").await.unwrap();
        assert_eq!(normalized.into_inner(), "Hola");
    }
}
