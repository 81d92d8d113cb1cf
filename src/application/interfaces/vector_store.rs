use async_trait::async_trait;

use crate::domain::{DistanceMetric, DomainError, ProductChunk, ProductFilters, SearchResult};

/// Storage and similarity search over embedded product chunks.
///
/// All operations are independent store round-trips: the store arbitrates
/// concurrent writes, isolation is whatever the backing store provides, and
/// transient store failures propagate unchanged (retries belong to the
/// caller's resilience layer).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts one chunk. Fails with `InvalidInput` before writing when the
    /// embedding length does not match the configured dimensionality.
    async fn create(&self, chunk: ProductChunk) -> Result<ProductChunk, DomainError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<ProductChunk>, DomainError>;

    /// Returns the product's first chunk (lowest `chunk_index`, then id),
    /// or `None` when the product has no indexed chunks.
    async fn get_by_product_id(&self, product_id: i64)
        -> Result<Option<ProductChunk>, DomainError>;

    /// Returns one page (ordered by creation time, then id) together with
    /// the total chunk count from the same logical read. `limit = 0` yields
    /// an empty page with a correct total.
    async fn list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ProductChunk>, u64), DomainError>;

    /// Ranks every candidate by distance to `query_embedding`, ascending,
    /// and returns at most `limit` results. When `threshold` is set, only
    /// candidates with `distance <= threshold` are considered, before the
    /// limit truncation. Ties break on ascending record id.
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        metric: DistanceMetric,
        limit: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>, DomainError>;

    /// Same ranking contract as [`similarity_search`](Self::similarity_search),
    /// but candidates are first restricted by `filters` (all set predicates
    /// must match). No distance threshold in this mode; the filters are the
    /// precision control.
    async fn hybrid_search(
        &self,
        query_embedding: &[f32],
        filters: &ProductFilters,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;

    /// Idempotent: returns `false` when no chunk had this id. The delete is
    /// committed before returning.
    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError>;

    /// Removes every chunk of the product. Returns `false` when none
    /// existed.
    async fn delete_by_product_id(&self, product_id: i64) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    /// Samples one arbitrary stored record and reports its embedding
    /// length; `None` on an empty store. Diagnostic only, not a validation
    /// path.
    async fn embedding_dimensions(&self) -> Result<Option<usize>, DomainError>;
}
