//! Persistence layer — the cache store fetch jobs write and handlers read.

pub mod db;
pub mod messages;
mod schema;
pub mod slots;

pub use db::Database;
pub use messages::{MessageDraft, MessageRecord, MessageStore};
pub use slots::SlotStore;

/// Seconds since epoch with sub-second precision, for write stamps.
pub(crate) fn now_epoch() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
