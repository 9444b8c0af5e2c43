//! Plan quality metrics (KPIs).
//!
//! Computes the planning-board headline figures from the current order
//! book, machine roster and job book.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled | Number of jobs |
//! | Unscheduled | Routing steps across all items minus scheduled |
//! | On-Time % | Jobs ending by their order's due date (100 with no jobs) |
//! | Utilization % | Run minutes / (machines × daily work window) |
//!
//! Percentages are rounded to the nearest integer.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{JobBook, Machine, Order};

/// Plan performance indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanKpi {
    /// Share of jobs finishing by their order's due date (0..=100).
    pub on_time_percent: u32,
    /// Run time over total machine capacity (may exceed 100 when overbooked).
    pub utilization_percent: u32,
    /// Number of scheduled operations.
    pub scheduled_count: usize,
    /// Number of operations without a job.
    pub unscheduled_count: usize,
    /// Per-machine run time over one work window, keyed by machine code.
    pub utilization_by_machine: BTreeMap<String, u32>,
}

impl PlanKpi {
    /// Computes KPIs.
    ///
    /// # Arguments
    /// * `orders` - The order book (due dates, routing sizes).
    /// * `machines` - The machine roster (capacity denominator).
    /// * `book` - Scheduled jobs.
    /// * `work_window_minutes` - Daily capacity of one machine.
    pub fn calculate(
        orders: &[Order],
        machines: &[Machine],
        book: &JobBook,
        work_window_minutes: u32,
    ) -> Self {
        let total_operations: usize = orders.iter().map(Order::operation_count).sum();
        let scheduled_count = book.len();

        let mut on_time: usize = 0;
        let mut total_run: u64 = 0;
        let mut run_by_machine: BTreeMap<&str, u64> = BTreeMap::new();

        for job in book.jobs() {
            // Jobs of unknown orders count as late
            let due = orders
                .iter()
                .find(|o| o.order_no == job.order_no())
                .map(Order::due_instant);
            if due.is_some_and(|d| job.end() <= d) {
                on_time += 1;
            }

            total_run += u64::from(job.run_min());
            *run_by_machine.entry(job.machine_code()).or_default() += u64::from(job.run_min());
        }

        let on_time_percent = if scheduled_count == 0 {
            100
        } else {
            percent(on_time as u64, scheduled_count as u64)
        };

        let window = u64::from(work_window_minutes);
        let utilization_percent = percent(total_run, machines.len() as u64 * window);

        let utilization_by_machine = machines
            .iter()
            .map(|m| {
                let run = run_by_machine.get(m.code.as_str()).copied().unwrap_or(0);
                (m.code.clone(), percent(run, window))
            })
            .collect();

        Self {
            on_time_percent,
            utilization_percent,
            scheduled_count,
            unscheduled_count: total_operations.saturating_sub(scheduled_count),
            utilization_by_machine,
        }
    }
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}
