//! Error types.
//!
//! Placement errors are user-facing validation failures: the rejected
//! placement leaves the job book untouched.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::JobId;

/// Rejection of a manual placement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The machine is not in the step's machine group.
    #[error("machine {machine} cannot perform {process} ({order_no}/{item_no} step {seq})")]
    Capability {
        order_no: String,
        item_no: u32,
        seq: u32,
        process: String,
        machine: String,
    },

    /// The preceding step has no job yet.
    #[error("step {seq} of {order_no}/{item_no} needs the previous step scheduled first")]
    Sequence {
        order_no: String,
        item_no: u32,
        seq: u32,
    },

    /// The operation already has a job; remove it before placing again.
    #[error("step {seq} of {order_no}/{item_no} is already scheduled as {existing}")]
    AlreadyScheduled {
        order_no: String,
        item_no: u32,
        seq: u32,
        existing: JobId,
    },

    /// No routing step `(order_no, item_no, seq)` in the order book.
    #[error("no operation {order_no}/{item_no} step {seq}")]
    UnknownOperation {
        order_no: String,
        item_no: u32,
        seq: u32,
    },

    /// No machine with this code in the roster.
    #[error("no machine {0}")]
    UnknownMachine(String),

    /// The job would end past the last representable instant.
    #[error(transparent)]
    TimeRange(#[from] TimeRangeError),
}

/// A job end that cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job starting at {start} and lasting {minutes} min ends outside the supported date range")]
pub struct TimeRangeError {
    pub start: NaiveDateTime,
    pub minutes: u64,
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid planner config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("work window must be positive, got {0} minutes")]
    InvalidWorkWindow(u32),
}
