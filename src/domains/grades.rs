//! Grade snapshots, one entry per enrolled course.

use serde::{Deserialize, Serialize};

use crate::store::SlotStore;

/// Slot key the grades sync job writes under.
pub const CACHE_KEY: &str = "grades";

/// One graded assessment within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub name: String,
    pub grade: String,
    /// Weight as shown by the registrar ("25%"); not always published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

/// All assessments for one course. A course with nothing published yet
/// carries an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrades {
    pub course: String,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

/// Latest cached grades for a user, if a sync has run.
pub async fn load(slots: &SlotStore, user_id: i64) -> Option<Vec<CourseGrades>> {
    slots.get_value(CACHE_KEY, user_id).await
}

/// Replace the cached grades for a user.
pub async fn save(slots: &SlotStore, user_id: i64, grades: &[CourseGrades]) {
    slots.set_value(CACHE_KEY, user_id, grades).await
}
