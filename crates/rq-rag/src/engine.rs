//! Query engine: normalize, embed, search and (optionally) answer

use std::sync::Arc;
use tracing::debug;

use rq_core::{
    AnswerResponse, CollectionInfo, EmbeddingProvider, Error, LLMProvider, QueryRequest, Result,
    RetrievalResponse, RetrievedPassage, VectorIndex,
};

use crate::config::QueryConfig;
use crate::generator::AnswerGenerator;
use crate::normalizer::LanguageNormalizer;

/// Collection and bound resolved from a request
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedQuery {
    collection: String,
    top_k: usize,
}

/// Composes the pipeline stages into the two public query operations.
///
/// Stages run strictly in order and any failure aborts the query; the engine
/// holds no per-query state, so one instance can serve concurrent queries.
pub struct QueryEngine<V: VectorIndex, L: LLMProvider> {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<V>,
    generator: Arc<AnswerGenerator<L>>,
    normalizer: LanguageNormalizer<L>,
    config: QueryConfig,
}

impl<V: VectorIndex, L: LLMProvider> QueryEngine<V, L> {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<V>, llm: L, config: QueryConfig) -> Self {
        let generator = Arc::new(AnswerGenerator::new(llm));
        let normalizer =
            LanguageNormalizer::new(Arc::clone(&generator), config.translation_failure_policy);

        Self {
            embedder,
            index,
            generator,
            normalizer,
            config,
        }
    }

    fn resolve(&self, request: &QueryRequest) -> Result<ResolvedQuery> {
        if request.question.trim().is_empty() {
            return Err(Error::Validation("question must not be empty".to_string()));
        }

        let top_k = request.top_k.unwrap_or(self.config.default_top_k);
        if top_k == 0 || top_k > self.config.max_top_k {
            return Err(Error::Validation(format!(
                "top_k must be between 1 and {}, got {}",
                self.config.max_top_k, top_k
            )));
        }

        let collection = request
            .collection
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.config.default_collection)
            .to_string();

        Ok(ResolvedQuery { collection, top_k })
    }

    async fn search(&self, question: &str, resolved: &ResolvedQuery) -> Result<Vec<RetrievedPassage>> {
        let normalized = self.normalizer.normalize_for_retrieval(question).await?;
        let vector = self.embedder.embed(normalized.as_str()).await?;
        let passages = self
            .index
            .search(&vector, &resolved.collection, resolved.top_k)
            .await?;

        debug!(
            collection = %resolved.collection,
            top_k = resolved.top_k,
            hits = passages.len(),
            "retrieved passages"
        );
        Ok(RetrievedPassage::rank(passages, resolved.top_k))
    }

    /// Return the passages most relevant to the question
    pub async fn retrieve(&self, request: &QueryRequest) -> Result<RetrievalResponse> {
        let resolved = self.resolve(request)?;
        let results = self.search(&request.question, &resolved).await?;

        Ok(RetrievalResponse {
            question: request.question.clone(),
            collection: resolved.collection,
            results,
        })
    }

    /// Retrieve, then answer from the retrieved passages in the question's own language
    pub async fn answer(&self, request: &QueryRequest) -> Result<AnswerResponse> {
        let retrieval = self.retrieve(request).await?;
        let answer = self
            .generator
            .answer(&request.question, &retrieval.results)
            .await?;

        Ok(AnswerResponse {
            question: retrieval.question,
            answer,
            sources: retrieval.results,
            collection: retrieval.collection,
        })
    }

    /// Point count and status of a collection
    pub async fn collection_info(&self, collection: &str) -> Result<CollectionInfo> {
        if collection.trim().is_empty() {
            return Err(Error::Validation("collection name must not be empty".to_string()));
        }
        self.index.collection_info(collection).await
    }
}
