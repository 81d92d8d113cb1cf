//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Vector storage (DuckDB on disk or in memory, plus a pure in-memory map)
//! - Embedding generation (mock for now, extensible for real models)

pub mod adapter;

pub use adapter::*;
