//! Assist Cache — background-refreshed local storage for assistant data.
//!
//! Fetch jobs write on their own schedules; request handlers only read.
//! A read that comes back empty means "no job has populated this yet",
//! never an error.

pub mod config;
pub mod domains;
pub mod error;
pub mod store;
