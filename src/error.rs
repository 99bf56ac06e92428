use chrono::NaiveDate;
use thiserror::Error;

/// Failures the day store can surface to callers.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode planner data: {0}")]
    Json(#[from] serde_json::Error),

    /// The record on disk was written by another session since this one
    /// loaded it. Reload the day and retry.
    #[error("day {day} was changed by another session (expected revision {expected}, found {found})")]
    StaleWrite {
        day: NaiveDate,
        expected: u64,
        found: u64,
    },
}
