use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{params, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::VectorStore;
use crate::domain::{
    DistanceMetric, DomainError, ProductChunk, ProductFilters, SearchResult, VectorStoreConfig,
};

const CHUNK_COLUMNS: &str =
    "id, product_id, seller_id, content, chunk_index, title, category, embedding, \
     created_at, updated_at";

/// DuckDB-backed vector store. Embeddings live in a fixed-size `FLOAT[n]`
/// array column; distances are computed in SQL with the built-in
/// `array_cosine_distance` / `array_distance` functions.
pub struct DuckdbVectorStore {
    conn: Arc<Mutex<Connection>>,
    config: VectorStoreConfig,
}

impl DuckdbVectorStore {
    pub fn new(path: &Path, config: VectorStoreConfig) -> Result<Self, DomainError> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize(&conn, &config)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    pub fn in_memory(config: VectorStoreConfig) -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB in-memory DB: {}", e)))?;
        Self::initialize(&conn, &config)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    pub fn config(&self) -> &VectorStoreConfig {
        &self.config
    }

    fn initialize(conn: &Connection, config: &VectorStoreConfig) -> Result<(), DomainError> {
        let schema = config.namespace().trim();
        let schema_name = if schema.is_empty() { "main" } else { schema };
        debug!("Initializing DuckDB with schema: {}", schema_name);

        conn.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS \"{}\";", schema_name))
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create DuckDB schema {}: {}",
                    schema_name, e
                ))
            })?;

        let create_table = format!(
            "\
            CREATE TABLE IF NOT EXISTS \"{schema}\".product_chunks (
                id TEXT PRIMARY KEY,
                product_id BIGINT NOT NULL,
                seller_id BIGINT NOT NULL,
                content TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                title TEXT NOT NULL,
                category TEXT NOT NULL,
                embedding FLOAT[{dims}] NOT NULL,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_product_category
                ON \"{schema}\".product_chunks (product_id, category);
            ",
            schema = schema_name,
            dims = config.dimensions()
        );
        conn.execute_batch(&create_table)
            .map_err(|e| DomainError::storage(format!("Failed to initialize DuckDB tables: {}", e)))?;
        debug!("product_chunks table ready in schema {}", schema_name);

        Ok(())
    }

    fn table(&self) -> String {
        format!("\"{}\".product_chunks", self.config.namespace())
    }

    fn check_dimensions(&self, vector: &[f32], what: &str) -> Result<(), DomainError> {
        if vector.len() != self.config.dimensions() {
            return Err(DomainError::invalid_input(format!(
                "Expected {} dimension {}, got {}",
                what,
                self.config.dimensions(),
                vector.len()
            )));
        }
        Ok(())
    }

    fn vector_to_array_literal(&self, vector: &[f32]) -> Result<String, DomainError> {
        self.check_dimensions(vector, "embedding")?;
        let mut s = String::with_capacity(vector.len() * 8);
        s.push('[');
        for (i, v) in vector.iter().enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            s.push_str(&format!("{}", v));
        }
        s.push(']');
        s.push_str(&format!("::FLOAT[{}]", self.config.dimensions()));
        Ok(s)
    }

    fn distance_expr(metric: DistanceMetric, array_literal: &str) -> String {
        match metric {
            DistanceMetric::Cosine => {
                format!("array_cosine_distance(embedding, {})", array_literal)
            }
            DistanceMetric::Euclidean => format!("array_distance(embedding, {})", array_literal),
        }
    }

    fn read_chunk(row: &Row<'_>) -> Result<ProductChunk, DomainError> {
        let embedding = Self::read_embedding(
            row.get::<_, Value>(7)
                .map_err(|e| DomainError::storage(format!("Failed to read embedding: {}", e)))?,
        )?;

        Ok(ProductChunk::reconstitute(
            row.get::<_, String>(0)
                .map_err(|e| DomainError::storage(format!("Failed to read id: {}", e)))?,
            row.get::<_, i64>(1)
                .map_err(|e| DomainError::storage(format!("Failed to read product_id: {}", e)))?,
            row.get::<_, i64>(2)
                .map_err(|e| DomainError::storage(format!("Failed to read seller_id: {}", e)))?,
            row.get::<_, String>(3)
                .map_err(|e| DomainError::storage(format!("Failed to read content: {}", e)))?,
            row.get::<_, i64>(4)
                .map_err(|e| DomainError::storage(format!("Failed to read chunk_index: {}", e)))?
                as u32,
            row.get::<_, String>(5)
                .map_err(|e| DomainError::storage(format!("Failed to read title: {}", e)))?,
            row.get::<_, String>(6)
                .map_err(|e| DomainError::storage(format!("Failed to read category: {}", e)))?,
            embedding,
            row.get::<_, i64>(8)
                .map_err(|e| DomainError::storage(format!("Failed to read created_at: {}", e)))?,
            row.get::<_, i64>(9)
                .map_err(|e| DomainError::storage(format!("Failed to read updated_at: {}", e)))?,
        ))
    }

    fn read_embedding(value: Value) -> Result<Vec<f32>, DomainError> {
        let items = match value {
            Value::Array(items) | Value::List(items) => items,
            other => {
                return Err(DomainError::storage(format!(
                    "Unexpected embedding column value: {:?}",
                    other
                )))
            }
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Float(f) => Ok(f),
                Value::Double(d) => Ok(d as f32),
                other => Err(DomainError::storage(format!(
                    "Unexpected embedding element: {:?}",
                    other
                ))),
            })
            .collect()
    }

    fn escape(value: &str) -> String {
        value.replace('\'', "''")
    }

    fn filter_clauses(filters: &ProductFilters) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(needle) = filters.title_contains() {
            clauses.push(format!("title ILIKE '%{}%'", Self::escape(needle)));
        }
        if let Some(product_id) = filters.product_id() {
            clauses.push(format!("product_id = {}", product_id));
        }
        if let Some(id) = filters.id() {
            clauses.push(format!("id = '{}'", Self::escape(id)));
        }
        clauses
    }

    async fn ranked_query(
        &self,
        sql: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare search: {}", e)))?;
        let mut rows = stmt
            .query(params![limit as i64])
            .map_err(|e| DomainError::storage(format!("Failed to run search: {}", e)))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?
        {
            let distance: f32 = row
                .get(10)
                .map_err(|e| DomainError::storage(format!("Failed to read distance: {}", e)))?;
            results.push(SearchResult::new(Self::read_chunk(row)?, distance));
        }
        Ok(results)
    }
}

#[async_trait]
impl VectorStore for DuckdbVectorStore {
    async fn create(&self, chunk: ProductChunk) -> Result<ProductChunk, DomainError> {
        // Dimensionality is validated before any write (the literal builder
        // rejects mismatched vectors).
        let array_literal = self.vector_to_array_literal(&chunk.embedding)?;
        // The array literal is part of the SQL text because DuckDB's fixed
        // FLOAT[n] type does not support parameter binding; all scalar
        // values stay parameterized.
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, {}, ?, ?)",
            self.table(),
            CHUNK_COLUMNS,
            array_literal
        );

        let conn = self.conn.lock().await;
        conn.execute(
            &sql,
            params![
                chunk.id,
                chunk.product_id,
                chunk.seller_id,
                chunk.content,
                chunk.chunk_index as i64,
                chunk.title,
                chunk.category,
                chunk.created_at,
                chunk.updated_at,
            ],
        )
        .map_err(|e| DomainError::storage(format!("Failed to insert chunk {}: {}", chunk.id, e)))?;

        debug!("Inserted chunk {} for product {}", chunk.id, chunk.product_id);
        Ok(chunk)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ProductChunk>, DomainError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?",
            CHUNK_COLUMNS,
            self.table()
        );

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare lookup: {}", e)))?;
        let mut rows = stmt
            .query(params![id])
            .map_err(|e| DomainError::storage(format!("Failed to run lookup: {}", e)))?;

        match rows
            .next()
            .map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?
        {
            Some(row) => Ok(Some(Self::read_chunk(row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_product_id(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductChunk>, DomainError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE product_id = ? ORDER BY chunk_index, id LIMIT 1",
            CHUNK_COLUMNS,
            self.table()
        );

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare lookup: {}", e)))?;
        let mut rows = stmt
            .query(params![product_id])
            .map_err(|e| DomainError::storage(format!("Failed to run lookup: {}", e)))?;

        match rows
            .next()
            .map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?
        {
            Some(row) => Ok(Some(Self::read_chunk(row)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<ProductChunk>, u64), DomainError> {
        let conn = self.conn.lock().await;

        let total: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table()), [], |row| {
                row.get(0)
            })
            .map_err(|e| DomainError::storage(format!("Failed to count chunks: {}", e)))?;

        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at, id LIMIT ? OFFSET ?",
            CHUNK_COLUMNS,
            self.table()
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare page query: {}", e)))?;
        let mut rows = stmt
            .query(params![limit as i64, offset as i64])
            .map_err(|e| DomainError::storage(format!("Failed to run page query: {}", e)))?;

        let mut chunks = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?
        {
            chunks.push(Self::read_chunk(row)?);
        }
        Ok((chunks, total as u64))
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        metric: DistanceMetric,
        limit: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.check_dimensions(query_embedding, "query embedding")?;
        let array_literal = self.vector_to_array_literal(query_embedding)?;
        let distance = Self::distance_expr(metric, &array_literal);

        let mut sql = format!(
            "SELECT {}, {} AS distance FROM {}",
            CHUNK_COLUMNS,
            distance,
            self.table()
        );
        // Threshold restricts candidates before the limit truncation.
        if let Some(threshold) = threshold {
            sql.push_str(&format!(" WHERE {} <= {}", distance, threshold));
        }
        // Ascending id breaks exact distance ties deterministically.
        sql.push_str(" ORDER BY distance, id LIMIT ?");

        debug!("Similarity search using {} metric", metric);
        self.ranked_query(&sql, limit).await
    }

    async fn hybrid_search(
        &self,
        query_embedding: &[f32],
        filters: &ProductFilters,
        metric: DistanceMetric,
        limit: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.check_dimensions(query_embedding, "query embedding")?;
        let array_literal = self.vector_to_array_literal(query_embedding)?;
        let distance = Self::distance_expr(metric, &array_literal);

        let mut sql = format!(
            "SELECT {}, {} AS distance FROM {}",
            CHUNK_COLUMNS,
            distance,
            self.table()
        );
        let clauses = Self::filter_clauses(filters);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY distance, id LIMIT ?");

        debug!(
            "Hybrid search using {} metric (filters: {})",
            metric,
            filters.summary()
        );
        self.ranked_query(&sql, limit).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?", self.table()),
                params![id],
            )
            .map_err(|e| DomainError::storage(format!("Failed to delete chunk: {}", e)))?;
        Ok(affected > 0)
    }

    async fn delete_by_product_id(&self, product_id: i64) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                &format!("DELETE FROM {} WHERE product_id = ?", self.table()),
                params![product_id],
            )
            .map_err(|e| DomainError::storage(format!("Failed to delete product chunks: {}", e)))?;
        debug!("Deleted {} chunk(s) for product {}", affected, product_id);
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table()), [], |row| {
                row.get(0)
            })
            .map_err(|e| DomainError::storage(format!("Failed to count chunks: {}", e)))?;
        Ok(count as u64)
    }

    async fn embedding_dimensions(&self) -> Result<Option<usize>, DomainError> {
        let sql = format!("SELECT array_length(embedding) FROM {} LIMIT 1", self.table());

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare dimension probe: {}", e)))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| DomainError::storage(format!("Failed to run dimension probe: {}", e)))?;

        match rows
            .next()
            .map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?
        {
            Some(row) => {
                let len: i64 = row
                    .get(0)
                    .map_err(|e| DomainError::storage(format!("Failed to read length: {}", e)))?;
                Ok(Some(len as usize))
            }
            None => Ok(None),
        }
    }
}
