//! Vector index trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, RetrievedPassage};

/// Metadata about a collection in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub points_count: u64,
    pub status: String,
}

/// Trait for vector indexes (e.g., Qdrant)
///
/// This trait only covers querying an already populated index; creating
/// collections and upserting points belong to the ingestion side.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest-neighbour search in `collection`.
    ///
    /// Returns at most `limit` passages ordered by descending score, or
    /// [`crate::Error::CollectionNotFound`] when the collection does not exist.
    async fn search(
        &self,
        vector: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedPassage>>;

    /// Point count and status of a collection
    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo>;
}
