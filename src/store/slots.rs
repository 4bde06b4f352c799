//! SlotStore — latest-value slots for structured payloads, per key and user.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::db::Database;
use super::now_epoch;
use crate::error::DatabaseError;

/// Latest-value cache backed by the `data_cache` table.
///
/// One row per (cache_key, user_id); every write replaces the previous
/// value wholesale: no merge, no history. Payloads are opaque JSON
/// here; the typed schemas live with each domain in [`crate::domains`].
pub struct SlotStore {
    db: Arc<Database>,
}

impl SlotStore {
    /// Create a new SlotStore over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Latest stored value for (key, user), or `None` when nothing
    /// usable is there.
    ///
    /// No freshness check happens here — a present-but-stale value is
    /// indistinguishable from a fresh one. Freshness is the writing
    /// job's responsibility through its own refresh cadence.
    pub async fn get_value<T: DeserializeOwned>(&self, key: &str, user_id: i64) -> Option<T> {
        let raw = match self.try_get(key, user_id).await {
            Ok(raw) => raw?,
            Err(e) => {
                error!(cache_key = key, user_id, error = %e, "Slot read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // An unreadable payload reads as a miss; the next refresh
                // overwrites it.
                warn!(cache_key = key, user_id, error = %e, "Stored slot payload failed to deserialize");
                None
            }
        }
    }

    /// Store the latest value for (key, user), replacing any prior one.
    ///
    /// A payload that fails to serialize is dropped and logged; the
    /// prior value stays authoritative rather than being clobbered.
    pub async fn set_value<T: Serialize + ?Sized>(&self, key: &str, user_id: i64, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                let e = DatabaseError::Serialization(e.to_string());
                error!(cache_key = key, user_id, error = %e, "Slot payload not storable, keeping prior value");
                return;
            }
        };
        match self.try_set(key, user_id, &json).await {
            Ok(()) => debug!(cache_key = key, user_id, "Slot updated"),
            Err(e) => {
                error!(cache_key = key, user_id, error = %e, "Slot write failed");
            }
        }
    }

    async fn try_get(&self, key: &str, user_id: i64) -> Result<Option<String>, DatabaseError> {
        let conn = self.db.conn().await?;
        let mut rows = conn
            .query(
                "SELECT json_data FROM data_cache WHERE cache_key = ?1 AND user_id = ?2",
                libsql::params![key, user_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_value: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let json: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_value row: {e}")))?;
                Ok(Some(json))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_value: {e}"))),
        }
    }

    async fn try_set(&self, key: &str, user_id: i64, json: &str) -> Result<(), DatabaseError> {
        let conn = self.db.conn().await?;
        conn.execute(
            "INSERT OR REPLACE INTO data_cache (cache_key, user_id, json_data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![key, user_id, json, now_epoch()],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("set_value: {e}")))?;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::config::CacheConfig;

    async fn test_store(tmp: &tempfile::TempDir) -> SlotStore {
        let config = CacheConfig {
            db_path: tmp.path().join("cache.db"),
            ..Default::default()
        };
        SlotStore::new(Arc::new(Database::open(&config).await.unwrap()))
    }

    #[tokio::test]
    async fn missing_slot_reads_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;
        assert!(store.get_value::<Value>("grades", 1).await.is_none());
    }

    #[tokio::test]
    async fn nested_payload_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;

        let payload = json!({
            "courses": [
                {"course": "CS 319", "assessments": [{"name": "Midterm", "grade": "87"}]},
                {"course": "MATH 230", "assessments": []},
            ],
            "term": "2026 Spring",
        });
        store.set_value("grades", 7, &payload).await;

        let loaded: Value = store.get_value("grades", 7).await.unwrap();
        assert_eq!(loaded, payload);
    }

    #[tokio::test]
    async fn overwrite_leaves_no_trace_of_the_old_value() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;

        store.set_value("grades", 1, &json!({"version": "A"})).await;
        store.set_value("grades", 1, &json!({"version": "B"})).await;

        let loaded: Value = store.get_value("grades", 1).await.unwrap();
        assert_eq!(loaded["version"], "B");

        // Exactly one row for the pair — replaced, not accumulated.
        let conn = store.db.conn().await.unwrap();
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM data_cache WHERE cache_key = 'grades' AND user_id = 1",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn slots_are_isolated_by_key_and_user() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;

        store.set_value("grades", 1, &json!({"gpa": 3.2})).await;

        assert!(store.get_value::<Value>("grades", 2).await.is_none());
        assert!(store.get_value::<Value>("attendance", 1).await.is_none());
        assert!(store.get_value::<Value>("grades", 1).await.is_some());
    }

    #[tokio::test]
    async fn corrupt_payload_reads_as_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;

        store.set_value("schedule", 3, &json!(["ok"])).await;

        let conn = store.db.conn().await.unwrap();
        conn.execute(
            "UPDATE data_cache SET json_data = '{broken' WHERE cache_key = 'schedule' AND user_id = 3",
            (),
        )
        .await
        .unwrap();

        assert!(store.get_value::<Value>("schedule", 3).await.is_none());
    }

    #[tokio::test]
    async fn unserializable_write_keeps_the_prior_value() {
        struct Unserializable;
        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let store = test_store(&tmp).await;

        store.set_value("grades", 1, &json!({"gpa": 3.8})).await;
        store.set_value("grades", 1, &Unserializable).await;

        let loaded: Value = store.get_value("grades", 1).await.unwrap();
        assert_eq!(loaded["gpa"], 3.8);
    }
}
