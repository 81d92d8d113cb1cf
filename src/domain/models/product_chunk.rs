use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk of product description text together with its vector embedding.
///
/// A product's description may be split into several chunks; `chunk_index`
/// records the chunk's position within the original text. Title and category
/// are denormalized from the catalog so search results can be displayed
/// without a second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductChunk {
    pub id: String,
    pub product_id: i64,
    pub seller_id: i64,
    pub content: String,
    pub chunk_index: u32,
    pub title: String,
    pub category: String,
    pub embedding: Vec<f32>,
    /// Unix epoch seconds.
    pub created_at: i64,
    /// Unix epoch seconds; never earlier than `created_at`.
    pub updated_at: i64,
}

impl ProductChunk {
    pub fn new(
        product_id: i64,
        seller_id: i64,
        title: String,
        category: String,
        content: String,
        embedding: Vec<f32>,
    ) -> Self {
        let now = epoch_seconds();
        Self {
            id: Uuid::new_v4().to_string(),
            product_id,
            seller_id,
            content,
            chunk_index: 0,
            title,
            category,
            embedding,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_chunk_index(mut self, index: u32) -> Self {
        self.chunk_index = index;
        self
    }

    /// Rebuilds a chunk from stored columns, preserving its original id and
    /// timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: String,
        product_id: i64,
        seller_id: i64,
        content: String,
        chunk_index: u32,
        title: String,
        category: String,
        embedding: Vec<f32>,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            product_id,
            seller_id,
            content,
            chunk_index,
            title,
            category,
            embedding,
            created_at,
            updated_at,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    pub fn display_line(&self) -> String {
        format!("{} [{}] #{}", self.title, self.category, self.chunk_index)
    }
}

fn epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
