//! Error types for the cache layer.

/// Database-related errors.
///
/// These never cross the public operation boundary: every store operation
/// catches them, logs with context, and falls back to its default result.
/// Only `Database::open` surfaces one to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Schema creation failed: {0}")]
    Schema(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
