//! Attendance records, one entry per tracked course.

use serde::{Deserialize, Serialize};

use crate::store::SlotStore;

/// Slot key the attendance sync job writes under.
pub const CACHE_KEY: &str = "attendance";

/// One attendance row — a lecture, lab, or spare hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub title: String,
    pub date: String,
    pub attended: bool,
    /// The page's original cell text ("1 / 1"), kept for display.
    #[serde(default)]
    pub raw: String,
}

/// Attendance for one course, with the published ratio when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAttendance {
    pub course: String,
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
    /// Ratio as published ("92.5%"); empty when the page omits it.
    #[serde(default)]
    pub ratio: String,
}

/// Latest cached attendance for a user, if a sync has run.
pub async fn load(slots: &SlotStore, user_id: i64) -> Option<Vec<CourseAttendance>> {
    slots.get_value(CACHE_KEY, user_id).await
}

/// Replace the cached attendance for a user.
pub async fn save(slots: &SlotStore, user_id: i64, attendance: &[CourseAttendance]) {
    slots.set_value(CACHE_KEY, user_id, attendance).await
}
