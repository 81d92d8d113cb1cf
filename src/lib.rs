pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    DeleteProductUseCase, EmbeddingService, IndexProductUseCase, SearchProductsUseCase,
    VectorStore,
};

pub use connector::{DuckdbVectorStore, InMemoryVectorStore, MockEmbedding};

pub use domain::{
    DistanceMetric, DomainError, EmbeddingConfig, ProductChunk, ProductFilters, SearchResult,
    VectorStoreConfig,
};
