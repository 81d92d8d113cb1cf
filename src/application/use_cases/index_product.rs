use std::sync::Arc;

use tracing::info;

use crate::application::{EmbeddingService, VectorStore};
use crate::domain::{DomainError, ProductChunk};

const MAX_CHUNK_CHARS: usize = 1000;

/// Indexes one product's description: splits it into chunks, embeds each
/// chunk, and replaces whatever was previously stored for the product.
pub struct IndexProductUseCase {
    store: Arc<dyn VectorStore>,
    embedding_service: Arc<dyn EmbeddingService>,
    max_chunk_chars: usize,
}

impl IndexProductUseCase {
    pub fn new(store: Arc<dyn VectorStore>, embedding_service: Arc<dyn EmbeddingService>) -> Self {
        Self {
            store,
            embedding_service,
            max_chunk_chars: MAX_CHUNK_CHARS,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chars: usize) -> Self {
        self.max_chunk_chars = max_chars.max(1);
        self
    }

    /// Returns the freshly stored chunks, in `chunk_index` order.
    pub async fn execute(
        &self,
        product_id: i64,
        seller_id: i64,
        title: &str,
        category: &str,
        description: &str,
    ) -> Result<Vec<ProductChunk>, DomainError> {
        let pieces = split_description(description, self.max_chunk_chars);
        if pieces.is_empty() {
            return Err(DomainError::invalid_input(format!(
                "Product {} has no description content to index",
                product_id
            )));
        }

        info!(
            "Indexing product {} ({}): {} chunk(s)",
            product_id,
            title,
            pieces.len()
        );

        let vectors = self.embedding_service.embed_texts(&pieces).await?;
        if vectors.len() != pieces.len() {
            return Err(DomainError::embedding(format!(
                "Expected {} embeddings, got {}",
                pieces.len(),
                vectors.len()
            )));
        }

        // Replace semantics: drop stale chunks before inserting the new set.
        let replaced = self.store.delete_by_product_id(product_id).await?;
        if replaced {
            info!("Replaced existing chunks for product {}", product_id);
        }

        let mut stored = Vec::with_capacity(pieces.len());
        for (index, (content, vector)) in pieces.into_iter().zip(vectors).enumerate() {
            let chunk = ProductChunk::new(
                product_id,
                seller_id,
                title.to_string(),
                category.to_string(),
                content,
                vector,
            )
            .with_chunk_index(index as u32);
            stored.push(self.store.create(chunk).await?);
        }

        Ok(stored)
    }
}

/// Splits a description into paragraph-aligned chunks of at most
/// `max_chars` characters. Paragraphs longer than the budget are split on
/// char boundaries.
fn split_description(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if !current.is_empty() && current.chars().count() + paragraph.chars().count() > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if paragraph.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = paragraph.chars().collect();
            for window in chars.chunks(max_chars) {
                chunks.push(window.iter().collect());
            }
            continue;
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
