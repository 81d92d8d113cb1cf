pub mod embedding_service;
pub mod vector_store;

pub use embedding_service::EmbeddingService;
pub use vector_store::VectorStore;
