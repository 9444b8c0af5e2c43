//! Planning board state.
//!
//! `PlanBoard` owns one snapshot of the order book, machine roster and job
//! book, and runs every planning operation against it. Each mutating call
//! computes a complete new job book and swaps it in, so a rejected or
//! no-op call leaves the board exactly as it was. The board is a plain
//! single-owner value; wrap it in a mutex or an actor to share it.

use chrono::NaiveDateTime;
use tracing::info;

use crate::config::PlannerConfig;
use crate::conflicts::detect_conflicts;
use crate::error::PlacementError;
use crate::models::{
    find_machine, find_operation, Conflict, JobBook, JobId, Machine, MachineStatus, Operation,
    Order,
};
use crate::placement::PlacementValidator;
use crate::scheduler::{unscheduled_operations, PlanKpi, SimpleScheduler, SkippedOperation};
use crate::validation::{validate_input, ValidationResult};

/// Snapshot of the planning board.
#[derive(Debug, Clone)]
pub struct PlanBoard {
    orders: Vec<Order>,
    machines: Vec<Machine>,
    book: JobBook,
    config: PlannerConfig,
}

/// Report of an auto-plan run.
#[derive(Debug, Clone, Default)]
pub struct AutoPlanReport {
    pub created: Vec<JobId>,
    pub skipped: Vec<SkippedOperation>,
}

impl PlanBoard {
    /// Creates a board with no scheduled jobs.
    pub fn new(orders: Vec<Order>, machines: Vec<Machine>, config: PlannerConfig) -> Self {
        Self {
            orders,
            machines,
            book: JobBook::new(),
            config,
        }
    }

    /// Restores previously scheduled jobs.
    pub fn with_jobs(mut self, book: JobBook) -> Self {
        self.book = book;
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn jobs(&self) -> &JobBook {
        &self.book
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Checks the order book and roster for structural problems.
    pub fn validate(&self) -> ValidationResult {
        validate_input(&self.orders, &self.machines)
    }

    /// Schedules every operation that has no job yet.
    pub fn auto_plan(&mut self) -> AutoPlanReport {
        let outcome = SimpleScheduler::from_config(&self.config).schedule(
            &self.orders,
            &self.machines,
            &self.book,
        );
        self.book = outcome.book;
        AutoPlanReport {
            created: outcome.created,
            skipped: outcome.skipped,
        }
    }

    /// Places one operation on a machine at the requested time.
    pub fn place(
        &mut self,
        order_no: &str,
        item_no: u32,
        seq: u32,
        machine_code: &str,
        requested_start: NaiveDateTime,
    ) -> Result<JobId, PlacementError> {
        let op = find_operation(&self.orders, order_no, item_no, seq).ok_or_else(|| {
            PlacementError::UnknownOperation {
                order_no: order_no.to_string(),
                item_no,
                seq,
            }
        })?;
        let machine = find_machine(&self.machines, machine_code)
            .ok_or_else(|| PlacementError::UnknownMachine(machine_code.to_string()))?;

        let placement = PlacementValidator::new().place(&self.book, &op, machine, requested_start)?;
        self.book = placement.book;
        Ok(placement.job_id)
    }

    /// Removes a job and every later step of its item.
    ///
    /// Returns the removed IDs; empty if `job_id` is unknown.
    pub fn remove(&mut self, job_id: JobId) -> Vec<JobId> {
        let removal = self.book.remove_cascade(job_id);
        self.book = removal.book;
        removal.removed
    }

    /// Updates a machine's live status. Returns `false` for an unknown code.
    ///
    /// Existing jobs stay where they are; a machine going into maintenance
    /// shows up as conflicts.
    pub fn set_machine_status(&mut self, machine_code: &str, status: MachineStatus) -> bool {
        match self.machines.iter_mut().find(|m| m.code == machine_code) {
            Some(machine) => {
                info!(machine = machine_code, from = ?machine.status, to = ?status, "machine status changed");
                machine.status = status;
                true
            }
            None => false,
        }
    }

    /// Operations that have no job, in order-book order.
    pub fn unscheduled_operations(&self) -> Vec<Operation<'_>> {
        unscheduled_operations(&self.orders, &self.book)
    }

    /// Current conflicts.
    pub fn conflicts(&self) -> Vec<Conflict> {
        detect_conflicts(&self.orders, &self.machines, &self.book)
    }

    /// Current KPIs.
    pub fn kpi(&self) -> PlanKpi {
        PlanKpi::calculate(
            &self.orders,
            &self.machines,
            &self.book,
            self.config.work_window_minutes,
        )
    }
}
