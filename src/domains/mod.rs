//! Typed payload schemas for the generic cache slots.
//!
//! The store keeps payloads opaque; each domain owns its schema and the
//! cache key it lives under. The fetch jobs refresh on their own
//! cadences (roughly: mail every 5 min, assignments every 10 min, grades
//! every 30 min, attendance hourly, schedule every 6 h, prune weekly);
//! nothing here enforces or depends on those intervals.

pub mod assignments;
pub mod attendance;
pub mod grades;
pub mod schedule;
