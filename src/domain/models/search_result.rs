use serde::{Deserialize, Serialize};

use super::ProductChunk;

/// A ranked search hit: a product chunk and its distance from the query
/// vector. Smaller distance is better; 0 means identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    chunk: ProductChunk,
    distance: f32,
}

impl SearchResult {
    pub fn new(chunk: ProductChunk, distance: f32) -> Self {
        Self { chunk, distance }
    }

    pub fn chunk(&self) -> &ProductChunk {
        &self.chunk
    }

    pub fn into_chunk(self) -> ProductChunk {
        self.chunk
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// `1.0 - distance`; a similarity reading for the cosine metric.
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }

    pub fn within(&self, threshold: f32) -> bool {
        self.distance <= threshold
    }

    pub fn display_line(&self) -> String {
        format!("{} (distance: {:.3})", self.chunk.display_line(), self.distance)
    }
}

/// Attribute filters for hybrid search. All set fields must match (logical
/// AND). The struct is closed: only the predicates below exist, so a
/// misspelled filter is a compile error for the caller rather than a
/// silently ignored key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilters {
    title_contains: Option<String>,
    product_id: Option<i64>,
    id: Option<String>,
}

impl ProductFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match against the chunk title.
    pub fn with_title_contains(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    pub fn with_product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title_contains(&self) -> Option<&str> {
        self.title_contains.as_deref()
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.title_contains.is_none() && self.product_id.is_none() && self.id.is_none()
    }

    /// Evaluates the filters against a chunk in process.
    pub fn matches(&self, chunk: &ProductChunk) -> bool {
        if let Some(needle) = &self.title_contains {
            if !chunk
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(product_id) = self.product_id {
            if chunk.product_id != product_id {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if &chunk.id != id {
                return false;
            }
        }
        true
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref needle) = self.title_contains {
            parts.push(format!("title_contains=\"{}\"", needle));
        }
        if let Some(product_id) = self.product_id {
            parts.push(format!("product_id={}", product_id));
        }
        if let Some(ref id) = self.id {
            parts.push(format!("id={}", id));
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}
