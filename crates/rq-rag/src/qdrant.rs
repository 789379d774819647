//! Qdrant vector index client

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CollectionInfo as QdrantCollectionInfo, CollectionStatus, QueryPointsBuilder, Value,
};
use std::collections::HashMap;
use std::fmt::Display;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use rq_core::{CollectionInfo, Error, Result, RetrievedPassage, VectorIndex};

use crate::config::QdrantConfig;

/// Payload key holding the passage text
pub const TEXT_KEY: &str = "text";
/// Payload key holding the source page number
pub const PAGE_NUMBER_KEY: &str = "page_number";

/// Qdrant-backed vector index.
///
/// The gRPC client is built on first use and shared by every later call;
/// concurrent first calls wait on the same initialization.
pub struct QdrantIndex {
    config: QdrantConfig,
    client: OnceCell<Qdrant>,
}

impl QdrantIndex {
    pub fn new(config: QdrantConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Whether the client has been created yet
    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    async fn connect(&self) -> Result<&Qdrant> {
        self.client
            .get_or_try_init(|| async {
                info!(url = %self.config.url, "connecting to Qdrant");
                Qdrant::from_url(&self.config.url)
                    .api_key(self.config.api_key.clone())
                    .timeout(self.config.timeout)
                    .build()
                    .map_err(|e| Error::VectorIndex(format!("failed to create Qdrant client: {}", e)))
            })
            .await
    }

    async fn classify(&self, client: &Qdrant, collection: &str, err: impl Display) -> Error {
        let exists = client.collection_exists(collection).await;
        classify_failure(collection, exists, err)
    }
}

/// Map a failed request to `CollectionNotFound` when the existence check says
/// the collection is missing, and to a generic index error otherwise.
fn classify_failure<E: Display>(
    collection: &str,
    exists: std::result::Result<bool, E>,
    err: impl Display,
) -> Error {
    match exists {
        Ok(false) => Error::CollectionNotFound(collection.to_string()),
        _ => Error::VectorIndex(format!("Qdrant request on '{}' failed: {}", collection, err)),
    }
}

fn collection_info_from(
    collection: &str,
    result: Option<QdrantCollectionInfo>,
) -> Result<CollectionInfo> {
    let info = result.ok_or_else(|| Error::CollectionNotFound(collection.to_string()))?;

    Ok(CollectionInfo {
        name: collection.to_string(),
        points_count: info.points_count.unwrap_or(0),
        status: status_name(info.status),
    })
}

/// Build a passage from a point payload; missing metadata never fails
pub fn passage_from_payload(payload: &HashMap<String, Value>, score: f32) -> RetrievedPassage {
    let text = match payload.get(TEXT_KEY).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    };

    let page_number = payload
        .get(PAGE_NUMBER_KEY)
        .and_then(|v| v.kind.as_ref())
        .and_then(|kind| match kind {
            Kind::IntegerValue(n) => Some(*n),
            Kind::DoubleValue(d) if d.is_finite() && d.fract() == 0.0 => Some(*d as i64),
            Kind::StringValue(s) => s.trim().parse().ok(),
            _ => None,
        });

    RetrievedPassage {
        text,
        page_number,
        score,
    }
}

fn status_name(status: i32) -> String {
    CollectionStatus::try_from(status)
        .map(|s| s.as_str_name().to_lowercase())
        .unwrap_or_else(|_| format!("unknown({})", status))
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(
        &self,
        vector: &[f32],
        collection: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedPassage>> {
        if limit == 0 {
            return Err(Error::Validation("limit must be at least 1".to_string()));
        }

        let client = self.connect().await?;
        let request = QueryPointsBuilder::new(collection)
            .query(vector.to_vec())
            .limit(limit as u64)
            .with_payload(true);

        let response = match client.query(request).await {
            Ok(response) => response,
            Err(err) => return Err(self.classify(client, collection, err).await),
        };

        let passages: Vec<RetrievedPassage> = response
            .result
            .iter()
            .map(|point| passage_from_payload(&point.payload, point.score))
            .collect();

        debug!(collection, hits = passages.len(), "Qdrant search complete");
        Ok(RetrievedPassage::rank(passages, limit))
    }

    async fn collection_info(&self, collection: &str) -> Result<CollectionInfo> {
        let client = self.connect().await?;

        let response = match client.collection_info(collection).await {
            Ok(response) => response,
            Err(err) => return Err(self.classify(client, collection, err).await),
        };

        collection_info_from(collection, response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(pairs: Vec<(&str, Value)>) -> HashMap<String, Value> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_passage_with_integer_page() {
        let point = payload(vec![
            ("text", Value::from("Check tire pressure monthly.")),
            ("page_number", Value::from(412_i64)),
        ]);

        let passage = passage_from_payload(&point, 0.82);
        assert_eq!(passage.text, "Check tire pressure monthly.");
        assert_eq!(passage.page_number, Some(412));
        assert_eq!(passage.score, 0.82);
    }

    #[test]
    fn test_page_number_variants() {
        let as_double = payload(vec![("page_number", Value::from(12.0_f64))]);
        assert_eq!(passage_from_payload(&as_double, 0.1).page_number, Some(12));

        let as_string = payload(vec![("page_number", Value::from("7"))]);
        assert_eq!(passage_from_payload(&as_string, 0.1).page_number, Some(7));

        let fractional = payload(vec![("page_number", Value::from(1.5_f64))]);
        assert_eq!(passage_from_payload(&fractional, 0.1).page_number, None);
    }

    #[test]
    fn test_missing_metadata_is_tolerated() {
        let passage = passage_from_payload(&HashMap::new(), 0.5);
        assert_eq!(passage.text, "");
        assert_eq!(passage.page_number, None);
    }

    #[test]
    fn test_status_name() {
        assert_eq!(status_name(CollectionStatus::Green as i32), "green");
        assert_eq!(status_name(42), "unknown(42)");
    }

    #[test]
    fn test_missing_collection_is_not_found() {
        let err = classify_failure("manuals", Ok::<_, String>(false), "status: NotFound");
        assert!(matches!(&err, Error::CollectionNotFound(name) if name == "manuals"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_existing_collection_failure_is_transient() {
        let err = classify_failure("manual", Ok::<_, String>(true), "deadline exceeded");
        assert!(matches!(err, Error::VectorIndex(_)));
        assert!(err.is_retryable());

        let err = classify_failure("manual", Err("connection refused"), "transport error");
        assert!(matches!(&err, Error::VectorIndex(msg) if msg.contains("transport error")));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_collection_info_without_result_is_not_found() {
        let err = collection_info_from("manuals", None).unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(_)));
    }

    #[test]
    fn test_collection_info_from_result() {
        let result = QdrantCollectionInfo {
            status: CollectionStatus::Yellow as i32,
            points_count: Some(1280),
            ..Default::default()
        };

        let info = collection_info_from("manual", Some(result)).unwrap();
        assert_eq!(info.name, "manual");
        assert_eq!(info.points_count, 1280);
        assert_eq!(info.status, "yellow");

        let empty = collection_info_from("fresh", Some(QdrantCollectionInfo::default())).unwrap();
        assert_eq!(empty.points_count, 0);
    }

    #[test]
    fn test_client_is_created_lazily() {
        let index = QdrantIndex::new(QdrantConfig::new("http://localhost:6334"));
        assert!(!index.is_connected());
    }
}
