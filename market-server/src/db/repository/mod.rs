//! Repository Module
//!
//! Query helpers over the embedded SurrealDB tables.

pub mod catalog;
pub mod order;
pub mod store;

// Re-exports
pub use catalog::CatalogRepository;
pub use order::OrderRepository;
pub use store::StoreRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: numeric snowflake keys on every table
// =============================================================================
//
// Records are created as `CREATE type::thing('table', $id)` with an
// app-generated i64, so the record key is numeric end to end:
//   - lookups bind RecordId::from_table_key("store", id)
//   - projections use record::id(id) AS id to read the key back as i64
//   - cross-table links are plain i64 columns (store_id, order_id, ...)
//
// Never store a RecordId inside a field; joins stay WHERE-clause based.

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
