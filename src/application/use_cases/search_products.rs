use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::application::{EmbeddingService, VectorStore};
use crate::domain::{DistanceMetric, DomainError, ProductFilters, SearchResult};

/// Embeds a text query and ranks product chunks against it.
pub struct SearchProductsUseCase {
    store: Arc<dyn VectorStore>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl SearchProductsUseCase {
    pub fn new(store: Arc<dyn VectorStore>, embedding_service: Arc<dyn EmbeddingService>) -> Self {
        Self {
            store,
            embedding_service,
        }
    }

    pub async fn execute(
        &self,
        query: &str,
        metric: DistanceMetric,
        limit: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        info!(
            "Searching for \"{}\" (metric={}, limit={})",
            query, metric, limit
        );
        let start = Instant::now();

        let query_embedding = self.embedding_service.embed_text(query).await?;
        let results = self
            .store
            .similarity_search(&query_embedding, metric, limit, threshold)
            .await?;

        info!(
            "Search returned {} result(s) in {:?}",
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }

    pub async fn execute_filtered(
        &self,
        query: &str,
        filters: &ProductFilters,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        info!(
            "Hybrid search for \"{}\" (metric={}, limit={}, filters: {})",
            query,
            metric,
            limit,
            filters.summary()
        );
        let start = Instant::now();

        let query_embedding = self.embedding_service.embed_text(query).await?;
        let results = self
            .store
            .hybrid_search(&query_embedding, filters, metric, limit)
            .await?;

        info!(
            "Hybrid search returned {} result(s) in {:?}",
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }
}
