//! Manual placement of a single operation.
//!
//! A planner drops one operation onto a machine at a requested time. The
//! placement is checked for machine capability and step order, then
//! committed. Overlap with other jobs and machine maintenance are not
//! checked here: the placement goes in and the conflict detector reports
//! the clash on its next pass.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::error::PlacementError;
use crate::models::{Job, JobBook, JobId, Machine, Operation};

/// A committed placement.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The book including the new job.
    pub book: JobBook,
    /// ID of the new job.
    pub job_id: JobId,
}

/// Validates and commits manual placements.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementValidator;

impl PlacementValidator {
    pub fn new() -> Self {
        Self
    }

    /// Places `op` on `machine` at `requested_start`.
    ///
    /// # Checks
    /// 1. `machine` is in the step's machine group.
    /// 2. The previous step of the item (if any) is scheduled.
    /// 3. The operation itself is not scheduled yet.
    ///
    /// The start is pushed back to the predecessor's end when requested
    /// earlier. A start so late that the job would end off the calendar is
    /// rejected with [`PlacementError::TimeRange`]. On error `book` is left
    /// as it was.
    #[instrument(skip_all, fields(
        order = %op.order.order_no,
        item = op.item.item_no,
        seq = op.step.seq,
        machine = %machine.code,
    ))]
    pub fn place(
        &self,
        book: &JobBook,
        op: &Operation<'_>,
        machine: &Machine,
        requested_start: NaiveDateTime,
    ) -> Result<Placement, PlacementError> {
        if !op.step.accepts(&machine.code) {
            return Err(PlacementError::Capability {
                order_no: op.order.order_no.clone(),
                item_no: op.item.item_no,
                seq: op.step.seq,
                process: op.step.process.clone(),
                machine: machine.code.clone(),
            });
        }

        let predecessor = book.predecessor_of(op);
        if op.step.seq > 1 && predecessor.is_none() {
            return Err(PlacementError::Sequence {
                order_no: op.order.order_no.clone(),
                item_no: op.item.item_no,
                seq: op.step.seq,
            });
        }

        if let Some(existing) = book.job_for_operation(op) {
            return Err(PlacementError::AlreadyScheduled {
                order_no: op.order.order_no.clone(),
                item_no: op.item.item_no,
                seq: op.step.seq,
                existing: existing.id(),
            });
        }

        let start = match predecessor {
            Some(pred) => requested_start.max(pred.end()),
            None => requested_start,
        };
        if start != requested_start {
            debug!(%requested_start, %start, "start clamped to predecessor end");
        }

        let mut book = book.clone();
        let job_id = book.allocate_id();
        let job = Job::new(job_id, op, &machine.code, start)?;
        book.insert(job);
        debug!(job = %job_id, "placement committed");

        Ok(Placement { book, job_id })
    }
}
