//! Greedy scheduler and KPI evaluation.
//!
//! # Algorithm
//!
//! `SimpleScheduler` is a deterministic greedy list scheduler: operations
//! are visited in a fixed dispatch order and each one goes to the
//! earliest-available eligible machine. It is not optimal, but it is fast,
//! reproducible, and conflict-free within one pass.
//!
//! # KPI
//!
//! `PlanKpi` computes the board headline figures: on-time rate,
//! utilization, scheduled and unscheduled counts.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;
mod simple;

pub use kpi::PlanKpi;
pub use simple::{
    compare_operations, unscheduled_operations, ScheduleOutcome, SimpleScheduler, SkipReason,
    SkippedOperation,
};
