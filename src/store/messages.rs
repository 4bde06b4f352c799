//! MessageStore — the append/overwrite log of fetched inbound mail.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::db::Database;
use super::now_epoch;
use crate::error::DatabaseError;

/// A cached inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub uid: String,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub preview: String,
    pub body: String,
    pub source: String,
    /// Seconds since epoch, stamped by the store at write time.
    pub inserted_at: f64,
}

/// Incoming message data from a fetch job. Absent fields stay empty.
///
/// `uid` is optional: without one, identity is derived from
/// (subject, sender, date), so refetching the same mail overwrites its
/// row instead of duplicating it. Two distinct mails sharing all three
/// fields merge; for mail headers that is acceptable in practice.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    pub uid: Option<String>,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub preview: String,
    pub body: String,
    pub source: String,
}

impl MessageDraft {
    fn resolved_uid(&self) -> String {
        match &self.uid {
            Some(uid) if !uid.is_empty() => uid.clone(),
            _ => format!("{}:{}:{}", self.subject, self.sender, self.date),
        }
    }
}

const MESSAGE_COLUMNS: &str =
    "uid, subject, from_addr, date, body_preview, body_full, source, inserted_at";

/// Message log backed by the `emails` table.
pub struct MessageStore {
    db: Arc<Database>,
}

impl MessageStore {
    /// Create a new MessageStore over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Upsert a batch of messages, stamping `inserted_at = now`.
    ///
    /// The whole batch is one transaction: on any failure nothing is
    /// persisted and 0 comes back. Callers treat 0 without an error as
    /// "retry on the next refresh", never as fatal.
    pub async fn store_batch(&self, drafts: &[MessageDraft]) -> usize {
        if drafts.is_empty() {
            return 0;
        }
        match self.try_store_batch(drafts).await {
            Ok(count) => {
                debug!(count, "Stored messages to cache");
                count
            }
            Err(e) => {
                error!(error = %e, count = drafts.len(), "Message cache write failed");
                0
            }
        }
    }

    async fn try_store_batch(&self, drafts: &[MessageDraft]) -> Result<usize, DatabaseError> {
        let conn = self.db.conn().await?;
        let now = now_epoch();

        conn.execute("BEGIN IMMEDIATE", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("store_batch begin: {e}")))?;

        for draft in drafts {
            let result = conn
                .execute(
                    "INSERT OR REPLACE INTO emails
                        (uid, subject, from_addr, date, body_preview, body_full, source, inserted_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    libsql::params![
                        draft.resolved_uid(),
                        draft.subject.clone(),
                        draft.sender.clone(),
                        draft.date.clone(),
                        draft.preview.clone(),
                        draft.body.clone(),
                        draft.source.clone(),
                        now,
                    ],
                )
                .await;
            if let Err(e) = result {
                let _ = conn.execute("ROLLBACK", ()).await;
                return Err(DatabaseError::Query(format!("store_batch insert: {e}")));
            }
        }

        conn.execute("COMMIT", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("store_batch commit: {e}")))?;
        Ok(drafts.len())
    }

    /// Most recent messages, newest first, at most `limit` of them.
    ///
    /// `None` means no fetch job has ever written here (or the read
    /// failed), which is distinct from `Some(vec![])`. There is no
    /// freshness check: whatever the last refresh wrote is what comes
    /// back.
    pub async fn recent(&self, limit: usize) -> Option<Vec<MessageRecord>> {
        match self.try_recent(limit).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Message cache read failed");
                None
            }
        }
    }

    async fn try_recent(&self, limit: usize) -> Result<Option<Vec<MessageRecord>>, DatabaseError> {
        let conn = self.db.conn().await?;

        // Zero rows total is the cold-start signal: no job has ever
        // completed a write. Pruning only removes old rows, so an empty
        // table cannot mean "nothing recent" once a write has happened.
        let mut rows = conn
            .query("SELECT COUNT(*) FROM emails", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("recent count: {e}")))?;
        let total: i64 = match rows.next().await {
            Ok(Some(row)) => row.get(0).unwrap_or(0),
            _ => 0,
        };
        if total == 0 {
            return Ok(None);
        }

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM emails
                     ORDER BY inserted_at DESC LIMIT ?1"
                ),
                libsql::params![limit as i64],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("recent: {e}")))?;

        let mut messages = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_record(&row) {
                Ok(record) => messages.push(record),
                Err(e) => warn!(error = %e, "Skipping unreadable message row"),
            }
        }
        Ok(Some(messages))
    }

    /// Delete messages older than `days` days. Returns the number deleted.
    ///
    /// Meant for a weekly cleanup job, but safe at any time and frequency.
    pub async fn prune_older_than(&self, days: u32) -> usize {
        match self.try_prune(days).await {
            Ok(count) => {
                if count > 0 {
                    info!(count, days, "Pruned old messages from cache");
                }
                count
            }
            Err(e) => {
                error!(error = %e, days, "Message cache prune failed");
                0
            }
        }
    }

    async fn try_prune(&self, days: u32) -> Result<usize, DatabaseError> {
        let conn = self.db.conn().await?;
        let cutoff = now_epoch() - f64::from(days) * 86_400.0;
        let count = conn
            .execute(
                "DELETE FROM emails WHERE inserted_at < ?1",
                libsql::params![cutoff],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("prune_older_than: {e}")))?;
        Ok(count as usize)
    }
}

fn row_to_record(row: &libsql::Row) -> Result<MessageRecord, libsql::Error> {
    Ok(MessageRecord {
        uid: row.get(0)?,
        subject: row.get(1)?,
        sender: row.get(2)?,
        date: row.get(3)?,
        preview: row.get(4)?,
        body: row.get(5)?,
        source: row.get(6)?,
        inserted_at: row.get(7)?,
    })
}

// ── Tests ───────────────────────────────────────────────────────────
