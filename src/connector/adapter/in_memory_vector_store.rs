use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorStore;
use crate::domain::{
    DistanceMetric, DomainError, ProductChunk, ProductFilters, SearchResult, VectorStoreConfig,
};

/// In-memory vector store with the same contract as the DuckDB adapter.
/// Distances are computed in process; useful as a test double and as the
/// reference implementation of the ranking semantics.
pub struct InMemoryVectorStore {
    chunks: Arc<Mutex<HashMap<String, ProductChunk>>>,
    config: VectorStoreConfig,
}

impl InMemoryVectorStore {
    pub fn new(config: VectorStoreConfig) -> Self {
        Self {
            chunks: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &VectorStoreConfig {
        &self.config
    }

    fn check_dimensions(&self, vector: &[f32], what: &str) -> Result<(), DomainError> {
        if vector.len() != self.config.dimensions() {
            return Err(DomainError::invalid_input(format!(
                "Expected {} dimension {}, got {}",
                what,
                self.config.dimensions(),
                vector.len()
            )));
        }
        Ok(())
    }

    async fn ranked(
        &self,
        query_embedding: &[f32],
        metric: DistanceMetric,
        limit: usize,
        threshold: Option<f32>,
        filters: Option<&ProductFilters>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.check_dimensions(query_embedding, "query embedding")?;

        let chunks = self.chunks.lock().await;
        let mut results: Vec<SearchResult> = chunks
            .values()
            .filter(|chunk| filters.map_or(true, |f| f.matches(chunk)))
            .map(|chunk| {
                let distance = metric.compute(&chunk.embedding, query_embedding);
                SearchResult::new(chunk.clone(), distance)
            })
            .filter(|result| threshold.map_or(true, |t| result.within(t)))
            .collect();

        // Ascending distance, ascending id on exact ties.
        results.sort_by(|a, b| {
            a.distance()
                .partial_cmp(&b.distance())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk().id.cmp(&b.chunk().id))
        });
        results.truncate(limit);
        Ok(results)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new(VectorStoreConfig::default())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create(&self, chunk: ProductChunk) -> Result<ProductChunk, DomainError> {
        self.check_dimensions(&chunk.embedding, "embedding")?;

        let mut chunks = self.chunks.lock().await;
        chunks.insert(chunk.id.clone(), chunk.clone());
        debug!("Stored chunk {} for product {}", chunk.id, chunk.product_id);
        Ok(chunk)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProductChunk>, DomainError> {
        let chunks = self.chunks.lock().await;
        Ok(chunks.get(id).cloned())
    }

    async fn get_by_product_id(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductChunk>, DomainError> {
        let chunks = self.chunks.lock().await;
        let mut matching: Vec<&ProductChunk> = chunks
            .values()
            .filter(|chunk| chunk.product_id == product_id)
            .collect();
        matching.sort_by(|a, b| {
            a.chunk_index
                .cmp(&b.chunk_index)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matching.first().map(|chunk| (*chunk).clone()))
    }

    async fn list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ProductChunk>, u64), DomainError> {
        let chunks = self.chunks.lock().await;
        let total = chunks.len() as u64;

        let mut all: Vec<&ProductChunk> = chunks.values().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let page = all
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        metric: DistanceMetric,
        limit: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.ranked(query_embedding, metric, limit, threshold, None)
            .await
    }

    async fn hybrid_search(
        &self,
        query_embedding: &[f32],
        filters: &ProductFilters,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.ranked(query_embedding, metric, limit, None, Some(filters))
            .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError> {
        let mut chunks = self.chunks.lock().await;
        Ok(chunks.remove(id).is_some())
    }

    async fn delete_by_product_id(&self, product_id: i64) -> Result<bool, DomainError> {
        let mut chunks = self.chunks.lock().await;
        let ids: Vec<String> = chunks
            .values()
            .filter(|chunk| chunk.product_id == product_id)
            .map(|chunk| chunk.id.clone())
            .collect();

        for id in &ids {
            chunks.remove(id);
        }
        debug!("Deleted {} chunk(s) for product {}", ids.len(), product_id);
        Ok(!ids.is_empty())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let chunks = self.chunks.lock().await;
        Ok(chunks.len() as u64)
    }

    async fn embedding_dimensions(&self) -> Result<Option<usize>, DomainError> {
        let chunks = self.chunks.lock().await;
        Ok(chunks.values().next().map(|chunk| chunk.dimensions()))
    }
}
