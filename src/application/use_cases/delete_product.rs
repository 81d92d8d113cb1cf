use std::sync::Arc;

use tracing::info;

use crate::application::VectorStore;
use crate::domain::DomainError;

/// Removes every indexed chunk of a product.
pub struct DeleteProductUseCase {
    store: Arc<dyn VectorStore>,
}

impl DeleteProductUseCase {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Returns `true` when chunks existed and were removed, `false` when
    /// there was nothing to delete. Callers branch on this (e.g. a 404).
    pub async fn execute(&self, product_id: i64) -> Result<bool, DomainError> {
        let deleted = self.store.delete_by_product_id(product_id).await?;
        if deleted {
            info!("Deleted indexed chunks for product {}", product_id);
        } else {
            info!("No indexed chunks for product {}", product_id);
        }
        Ok(deleted)
    }
}
