//! In-memory vector index

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use rq_core::{CollectionInfo, Error, Result, RetrievedPassage, VectorIndex};

#[derive(Debug, Clone)]
struct IndexedPassage {
    text: String,
    page_number: Option<i64>,
    embedding: Vec<f32>,
}

/// Named collections of embedded passages ranked by cosine similarity.
///
/// Satisfies the same contract as the Qdrant client, including
/// `CollectionNotFound` for unknown collections and dimension checks, and
/// serves as the reference index the engine is tested against.
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Vec<IndexedPassage>>>,
}

impl InMemoryIndex {
    /// Create an empty index with no collections
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty collection; existing collections are left untouched
    pub fn create_collection(&self, name: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))?;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    /// Add an embedded passage to a collection, creating it if needed
    pub fn insert(
        &self,
        collection: &str,
        text: impl Into<String>,
        page_number: Option<i64>,
        embedding: Vec<f32>,
    ) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))?;
        let passages = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = passages.first() {
            if existing.embedding.len() != embedding.len() {
                return Err(Error::VectorIndex(format!(
                    "collection '{}' stores {}-dimensional vectors, got {}",
                    collection,
                    existing.embedding.len(),
                    embedding.len()
                )));
            }
        }

        passages.push(IndexedPassage {
            text: text.into(),
            page_number,
            embedding,
        });
        Ok(())
    }

    /// Simple cosine similarity calculation
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn search(
        &self,
        vector: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedPassage>> {
        if limit == 0 {
            return Err(Error::Validation("limit must be at least 1".to_string()));
        }

        let collections = self
            .collections
            .read()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))?;
        let passages = collections
            .get(collection)
            .ok_or_else(|| Error::CollectionNotFound(collection.to_string()))?;

        if let Some(existing) = passages.first() {
            if existing.embedding.len() != vector.len() {
                return Err(Error::VectorIndex(format!(
                    "query vector has {} dimensions, collection '{}' expects {}",
                    vector.len(),
                    collection,
                    existing.embedding.len()
                )));
            }
        }

        let scored: Vec<RetrievedPassage> = passages
            .iter()
            .map(|p| RetrievedPassage {
                text: p.text.clone(),
                page_number: p.page_number,
                score: Self::cosine_similarity(vector, &p.embedding),
            })
            .collect();

        Ok(RetrievedPassage::rank(scored, limit))
    }

    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo> {
        let collections = self
            .collections
            .read()
            .map_err(|e| Error::VectorIndex(format!("Lock error: {}", e)))?;
        let passages = collections
            .get(collection)
            .ok_or_else(|| Error::CollectionNotFound(collection.to_string()))?;

        Ok(CollectionInfo {
            name: collection.to_string(),
            points_count: passages.len() as u64,
            status: "green".to_string(),
        })
    }
}
