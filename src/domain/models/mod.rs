pub mod config;
pub mod distance;
pub mod product_chunk;
pub mod search_result;

pub use config::{EmbeddingConfig, VectorStoreConfig};
pub use distance::DistanceMetric;
pub use product_chunk::ProductChunk;
pub use search_result::{ProductFilters, SearchResult};
