//! Planning domain models.
//!
//! Provides the value types the planner reads (orders, routings, machines)
//! and the ones it produces (jobs, conflicts).
//!
//! # Domain Mappings
//!
//! | u-planboard | Job-shop term |
//! |-------------|---------------|
//! | Order / Item | Job family / Job |
//! | RoutingStep | Operation |
//! | Machine | Resource |
//! | Job | Assignment |
//! | JobBook | Schedule |

mod conflict;
mod job;
mod job_book;
mod machine;
mod order;

pub use conflict::{Conflict, ConflictKind};
pub use job::{Job, JobId};
pub use job_book::{JobBook, Removal};
pub use machine::{find_machine, Machine, MachineStatus};
pub use order::{find_operation, Item, ItemKey, ItemStatus, Operation, Order, RoutingStep};
