//! Schema creation — idempotent DDL, run on every fresh connection.

use libsql::Connection;

use crate::error::DatabaseError;

/// Create the cache tables if they are missing.
///
/// Runs on every connection handout, so no caller has to remember an
/// explicit initialization step and no in-process "already initialized"
/// flag exists. `IF NOT EXISTS` makes repeated and concurrent runs
/// harmless.
pub(crate) async fn init_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS emails (
            uid          TEXT PRIMARY KEY,
            subject      TEXT NOT NULL DEFAULT '',
            from_addr    TEXT NOT NULL DEFAULT '',
            date         TEXT NOT NULL DEFAULT '',
            body_preview TEXT NOT NULL DEFAULT '',
            body_full    TEXT NOT NULL DEFAULT '',
            source       TEXT NOT NULL DEFAULT '',
            inserted_at  REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_emails_inserted
            ON emails (inserted_at DESC);

        CREATE TABLE IF NOT EXISTS data_cache (
            cache_key  TEXT    NOT NULL,
            user_id    INTEGER NOT NULL,
            json_data  TEXT    NOT NULL,
            updated_at REAL    NOT NULL,
            PRIMARY KEY (cache_key, user_id)
        );",
    )
    .await
    .map_err(|e| DatabaseError::Schema(format!("init_schema: {e}")))?;
    Ok(())
}
