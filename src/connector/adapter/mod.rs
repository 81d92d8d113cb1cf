pub mod duckdb_vector_store;
pub mod in_memory_vector_store;
pub mod mock_embedding;

pub use duckdb_vector_store::DuckdbVectorStore;
pub use in_memory_vector_store::InMemoryVectorStore;
pub use mock_embedding::MockEmbedding;
