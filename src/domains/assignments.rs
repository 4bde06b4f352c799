//! Upcoming assignment listings.

use serde::{Deserialize, Serialize};

use crate::store::SlotStore;

/// Slot key the assignment sync job writes under.
pub const CACHE_KEY: &str = "assignments";

/// The trimmed assignment form cached for quick listing: enough to
/// answer "what is due and when" without another fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub course_name: String,
    #[serde(default)]
    pub submitted: bool,
    /// Due date as seconds since epoch; `None` when no deadline is set.
    #[serde(default)]
    pub due_date: Option<i64>,
    /// Human-readable remaining time ("2 days 4 hours"), as fetched.
    #[serde(default)]
    pub time_remaining: String,
}

/// Latest cached assignments for a user, if a sync has run.
pub async fn load(slots: &SlotStore, user_id: i64) -> Option<Vec<Assignment>> {
    slots.get_value(CACHE_KEY, user_id).await
}

/// Replace the cached assignments for a user.
pub async fn save(slots: &SlotStore, user_id: i64, assignments: &[Assignment]) {
    slots.set_value(CACHE_KEY, user_id, assignments).await
}
