use serde::{Deserialize, Serialize};

/// Configuration for a vector store instance, injected at construction.
///
/// `dimensions` fixes the embedding dimensionality every stored record must
/// have; `namespace` selects the storage schema, letting several stores
/// share one database file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    dimensions: usize,
    namespace: String,
}

impl VectorStoreConfig {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            namespace: "main".to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self::new(768)
    }
}

/// Configuration for an embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    model_name: String,
    dimensions: usize,
}

impl EmbeddingConfig {
    pub fn new(model_name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimensions,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::new("mock-embedding", 768)
    }
}
