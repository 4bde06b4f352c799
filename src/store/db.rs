//! Database handle — one libSQL file, a fresh connection per operation.

use std::sync::Arc;

use libsql::Connection;
use tracing::info;

use super::schema;
use crate::config::CacheConfig;
use crate::error::DatabaseError;

/// Shared handle to the cache database file.
///
/// Holds no open connection. Every operation asks for a fresh one via
/// [`Database::conn`] and drops it on the way out, keeping lock windows
/// as short as the statements that need them.
pub struct Database {
    db: Arc<libsql::Database>,
    busy_timeout_ms: u64,
}

impl Database {
    /// Open (or create) the database file and create the schema.
    ///
    /// Safe to call any number of times, from any number of processes;
    /// schema creation is guarded by `IF NOT EXISTS` all the way down.
    pub async fn open(config: &CacheConfig) -> Result<Self, DatabaseError> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Open(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = libsql::Builder::new_local(&config.db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::Open(format!("Failed to open database: {e}")))?;

        let db = Self {
            db: Arc::new(db),
            busy_timeout_ms: config.busy_timeout.as_millis() as u64,
        };

        // Surface an unusable path or broken schema here, where callers
        // still get a Result, rather than on the first real operation.
        db.conn().await?;
        info!(path = %config.db_path.display(), "Cache database opened");
        Ok(db)
    }

    /// A fresh connection with pragmas applied and the schema ensured.
    ///
    /// WAL keeps readers unblocked while a writer is in flight; NORMAL
    /// sync is enough for data that can always be refetched. The busy
    /// timeout bounds how long a write waits on a competing writer.
    pub(crate) async fn conn(&self) -> Result<Connection, DatabaseError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DatabaseError::Open(format!("Failed to create connection: {e}")))?;

        // Busy timeout first, so the remaining pragmas wait out a
        // concurrent first-time open instead of failing on its lock.
        for pragma in [
            format!("PRAGMA busy_timeout={}", self.busy_timeout_ms),
            "PRAGMA journal_mode=WAL".to_string(),
            "PRAGMA synchronous=NORMAL".to_string(),
        ] {
            let mut rows = conn
                .query(&pragma, ())
                .await
                .map_err(|e| DatabaseError::Open(format!("{pragma}: {e}")))?;
            // Some pragmas echo their value back; drain so the statement
            // finishes before the next one runs.
            while let Ok(Some(_)) = rows.next().await {}
        }

        schema::init_schema(&conn).await?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            db_path: tmp.path().join("nested").join("dir").join("cache.db"),
            ..Default::default()
        };
        let _db = Database::open(&config).await.unwrap();
        assert!(config.db_path.exists());
    }

    #[tokio::test]
    async fn concurrent_opens_of_the_same_path() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            db_path: tmp.path().join("cache.db"),
            ..Default::default()
        };
        let (a, b) = tokio::join!(Database::open(&config), Database::open(&config));
        a.unwrap();
        b.unwrap();
    }

    #[tokio::test]
    async fn every_connection_sees_the_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            db_path: tmp.path().join("cache.db"),
            ..Default::default()
        };
        let db = Database::open(&config).await.unwrap();

        for _ in 0..3 {
            let conn = db.conn().await.unwrap();
            let mut rows = conn
                .query(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('emails', 'data_cache')",
                    (),
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap().unwrap();
            let count: i64 = row.get(0).unwrap();
            assert_eq!(count, 2);
        }
    }
}
