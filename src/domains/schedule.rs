//! Weekly class schedule entries.

use serde::{Deserialize, Serialize};

use crate::store::SlotStore;

/// Slot key the schedule sync job writes under.
pub const CACHE_KEY: &str = "schedule";

/// One scheduled class hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    pub course: String,
    pub room: String,
    /// The timetable cell's original text, kept for display fallbacks.
    #[serde(default)]
    pub raw: String,
}

/// Latest cached schedule for a user, if a sync has run.
pub async fn load(slots: &SlotStore, user_id: i64) -> Option<Vec<ScheduleEntry>> {
    slots.get_value(CACHE_KEY, user_id).await
}

/// Replace the cached schedule for a user.
pub async fn save(slots: &SlotStore, user_id: i64, schedule: &[ScheduleEntry]) {
    slots.set_value(CACHE_KEY, user_id, schedule).await
}
