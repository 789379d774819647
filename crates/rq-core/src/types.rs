//! Request and response types shared by the query pipeline

use serde::{Deserialize, Serialize};

/// A passage returned by the vector index for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub page_number: Option<i64>,
    pub score: f32,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, page_number: Option<i64>, score: f32) -> Self {
        Self {
            text: text.into(),
            page_number,
            score,
        }
    }

    /// Order passages by descending score and keep at most `limit`.
    ///
    /// The sort is stable so passages with equal scores keep the index's order.
    pub fn rank(mut passages: Vec<RetrievedPassage>, limit: usize) -> Vec<RetrievedPassage> {
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        passages.truncate(limit);
        passages
    }
}

/// Input shared by the retrieval and answer operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub collection: Option<String>,
    pub top_k: Option<usize>,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            collection: None,
            top_k: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Raw retrieval result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResponse {
    /// The question as the caller asked it, not its normalized form
    pub question: String,
    pub collection: String,
    pub results: Vec<RetrievedPassage>,
}

/// Synthesized answer with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<RetrievedPassage>,
    pub collection: String,
}
