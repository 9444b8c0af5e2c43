//! Greedy list scheduler ("auto plan").
//!
//! # Algorithm
//!
//! 1. Collect every operation without a job.
//! 2. Sort by priority, due date, order number, item number, step.
//! 3. Start every machine cursor at the horizon start.
//! 4. For each operation, pick the eligible machine (in the step's machine
//!    group, not under maintenance) with the earliest feasible start;
//!    ties go to the machine declared first in the roster.
//! 5. Start at `max(cursor, predecessor end)`; advance the cursor to the
//!    job's end.
//!
//! Operations whose predecessor is unscheduled, with no eligible machine,
//! or that would end past the last representable instant are skipped. A skipped step also skips the remaining steps of
//! its item for this pass.
//!
//! # Complexity
//! O(n log n + n * m) where n=operations, m=machines.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::config::PlannerConfig;
use crate::models::{Job, JobBook, JobId, Machine, Operation, Order};

/// Greedy list scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_planboard::models::{Item, JobBook, Machine, Order, RoutingStep};
/// use u_planboard::scheduler::SimpleScheduler;
///
/// let orders = vec![
///     Order::new("ORD001", "ACME", NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(), 1).with_item(
///         Item::new(1, "Widget A", 100)
///             .with_step(RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001"])),
///     ),
/// ];
/// let machines = vec![Machine::new("M001")];
/// let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
///
/// let outcome = SimpleScheduler::new(start).schedule(&orders, &machines, &JobBook::new());
/// assert_eq!(outcome.book.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleScheduler {
    horizon_start: NaiveDateTime,
}

/// Result of a scheduling pass.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Input jobs plus the jobs created by this pass.
    pub book: JobBook,
    /// Jobs created by this pass, in creation order.
    pub created: Vec<JobId>,
    /// Operations left unscheduled by this pass, in visiting order.
    pub skipped: Vec<SkippedOperation>,
}

/// An operation the scheduler could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOperation {
    pub order_no: String,
    pub item_no: u32,
    pub seq: u32,
    pub reason: SkipReason,
}

/// Why an operation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The previous step of the item has no job.
    PredecessorUnscheduled,
    /// Every machine in the step's group is under maintenance or unknown.
    NoEligibleMachine,
    /// The job would end outside the supported date range.
    OutOfRange,
}

impl SimpleScheduler {
    /// Creates a scheduler anchored at `horizon_start`.
    pub fn new(horizon_start: NaiveDateTime) -> Self {
        Self { horizon_start }
    }

    /// Creates a scheduler from the planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.horizon_start)
    }

    /// Schedules every operation that has no job yet.
    ///
    /// Existing jobs are carried over unchanged; the returned book is a
    /// superset of `book`.
    #[instrument(skip_all, fields(orders = orders.len(), machines = machines.len(), existing = book.len()))]
    pub fn schedule(&self, orders: &[Order], machines: &[Machine], book: &JobBook) -> ScheduleOutcome {
        let mut book = book.clone();
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        // Machine cursors, in roster order
        let mut next_available: Vec<NaiveDateTime> = vec![self.horizon_start; machines.len()];

        let pending = sort_operations(unscheduled_operations(orders, &book));

        for op in pending {
            let predecessor_end = if op.seq() > 1 {
                match book.predecessor_of(&op) {
                    Some(pred) => Some(pred.end()),
                    None => {
                        skipped.push(SkippedOperation::new(&op, SkipReason::PredecessorUnscheduled));
                        continue;
                    }
                }
            } else {
                None
            };
            let earliest = predecessor_end.unwrap_or(self.horizon_start);

            // Earliest feasible start; ties keep the machine declared first
            let mut best: Option<(usize, NaiveDateTime)> = None;
            for (idx, machine) in machines.iter().enumerate() {
                if !machine.is_available() || !op.step.accepts(&machine.code) {
                    continue;
                }
                let start = next_available[idx].max(earliest);
                match best {
                    Some((_, best_start)) if best_start <= start => {}
                    _ => best = Some((idx, start)),
                }
            }

            let Some((idx, start)) = best else {
                skipped.push(SkippedOperation::new(&op, SkipReason::NoEligibleMachine));
                continue;
            };

            let id = book.allocate_id();
            let job = match Job::new(id, &op, &machines[idx].code, start) {
                Ok(job) => job,
                Err(err) => {
                    warn!(%err, "operation cannot be placed");
                    skipped.push(SkippedOperation::new(&op, SkipReason::OutOfRange));
                    continue;
                }
            };
            next_available[idx] = job.end();
            created.push(id);
            book.insert(job);
        }

        for skip in &skipped {
            debug!(
                order = %skip.order_no,
                item = skip.item_no,
                seq = skip.seq,
                reason = ?skip.reason,
                "operation left unscheduled"
            );
        }
        info!(created = created.len(), skipped = skipped.len(), "auto plan finished");

        ScheduleOutcome {
            book,
            created,
            skipped,
        }
    }
}

impl SkippedOperation {
    fn new(op: &Operation<'_>, reason: SkipReason) -> Self {
        Self {
            order_no: op.order.order_no.clone(),
            item_no: op.item.item_no,
            seq: op.step.seq,
            reason,
        }
    }
}

/// Returns every operation in `orders` that has no job in `book`.
///
/// A routing that repeats a step number yields that step once, the first
/// occurrence in order-book order.
pub fn unscheduled_operations<'a>(orders: &'a [Order], book: &JobBook) -> Vec<Operation<'a>> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .flat_map(Order::operations)
        .filter(|op| seen.insert((op.order.order_no.as_str(), op.item.item_no, op.step.seq)))
        .filter(|op| book.job_for_operation(op).is_none())
        .collect()
}

/// Dispatch order: priority, due date, order number, item number, step.
pub fn compare_operations(a: &Operation<'_>, b: &Operation<'_>) -> Ordering {
    a.order
        .priority
        .cmp(&b.order.priority)
        .then_with(|| a.order.due_date.cmp(&b.order.due_date))
        .then_with(|| a.order.order_no.cmp(&b.order.order_no))
        .then_with(|| a.item.item_no.cmp(&b.item.item_no))
        .then_with(|| a.step.seq.cmp(&b.step.seq))
}

fn sort_operations(mut ops: Vec<Operation<'_>>) -> Vec<Operation<'_>> {
    ops.sort_by(compare_operations);
    ops
}
