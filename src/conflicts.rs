//! Conflict detection.
//!
//! A stateless pass over the whole job book. It is safe to run after every
//! edit and holds nothing between calls.
//!
//! # Rules
//! - **Overlap**: two jobs on one machine with intersecting `[start, end)`.
//! - **Sequence**: a job starting before its predecessor step ends.
//! - **Maintenance**: a job on a machine whose status is `PM`.
//! - **Capability**: a job on a machine outside its step's machine group.
//!
//! # Complexity
//! O(J²) in the pairwise overlap check, O(J) for the other rules. Fine for
//! board-sized plans; a sweep over start-sorted jobs per machine is the
//! upgrade path if plans grow.

use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::models::{find_machine, find_operation, Conflict, Job, JobBook, Machine, Order};

/// Detects every conflict in `book`.
///
/// Output order: overlaps (by job pair), then per job in ID order its
/// sequence, maintenance and capability conflicts.
#[instrument(skip_all, fields(jobs = book.len()))]
pub fn detect_conflicts(orders: &[Order], machines: &[Machine], book: &JobBook) -> Vec<Conflict> {
    let mut conflicts = overlap_conflicts(book);

    for job in book.jobs() {
        if let Some(pred) = book.predecessor_of_job(job) {
            if job.start() < pred.end() {
                conflicts.push(Conflict::Sequence {
                    job: job.id(),
                    predecessor: pred.id(),
                });
            }
        }

        if find_machine(machines, job.machine_code()).is_some_and(Machine::in_maintenance) {
            conflicts.push(Conflict::Maintenance {
                job: job.id(),
                machine: job.machine_code().to_string(),
            });
        }

        // Jobs whose step is no longer in the order book have nothing to check against
        if let Some(op) = find_operation(orders, job.order_no(), job.item_no(), job.seq()) {
            if !op.step.accepts(job.machine_code()) {
                conflicts.push(Conflict::Capability {
                    job: job.id(),
                    machine: job.machine_code().to_string(),
                    process: job.process().to_string(),
                });
            }
        }
    }

    debug!(conflicts = conflicts.len(), "conflict pass finished");
    conflicts
}

fn overlap_conflicts(book: &JobBook) -> Vec<Conflict> {
    let mut by_machine: BTreeMap<&str, Vec<&Job>> = BTreeMap::new();
    for job in book.jobs() {
        by_machine.entry(job.machine_code()).or_default().push(job);
    }

    let mut pairs = Vec::new();
    for (machine, jobs) in by_machine {
        for (i, a) in jobs.iter().enumerate() {
            for b in &jobs[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.id(), b.id(), machine));
                }
            }
        }
    }
    pairs.sort();

    pairs
        .into_iter()
        .map(|(job_a, job_b, machine)| Conflict::Overlap {
            job_a,
            job_b,
            machine: machine.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictKind, Item, JobId, MachineStatus, RoutingStep};
    use crate::placement::PlacementValidator;
    use crate::scheduler::SimpleScheduler;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn orders() -> Vec<Order> {
        let due = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        vec![
            Order::new("ORD001", "ACME", due, 1).with_item(
                Item::new(1, "Widget A", 100)
                    .with_step(
                        RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001", "M002"]),
                    )
                    .with_step(
                        RoutingStep::new(2, "DRILL", 20, 60).with_machines(["M001", "M002"]),
                    )
                    .with_step(RoutingStep::new(3, "ASSY", 15, 90).with_machines(["M003"])),
            ),
            Order::new("ORD002", "Globex", due, 2).with_item(
                Item::new(1, "Bracket", 40)
                    .with_step(RoutingStep::new(1, "MACH", 10, 50).with_machines(["M001"])),
            ),
        ]
    }

    fn roster() -> Vec<Machine> {
        vec![Machine::new("M001"), Machine::new("M002"), Machine::new("M003")]
    }

    fn kinds(conflicts: &[Conflict]) -> Vec<ConflictKind> {
        conflicts.iter().map(Conflict::kind).collect()
    }

    #[test]
    fn test_scheduler_output_is_clean() {
        let orders = orders();
        let machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;
        assert_eq!(book.len(), 4);
        assert!(detect_conflicts(&orders, &machines, &book).is_empty());
    }

    #[test]
    fn test_manual_overlap_reported() {
        let orders = orders();
        let machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;
        let existing = book.job_for("ORD001", 1, 1).unwrap().id();
        let without_bracket = book
            .remove_cascade(book.job_for("ORD002", 1, 1).unwrap().id())
            .book;

        // Drop the bracket onto M001 during ORD001's first step
        let op = find_operation(&orders, "ORD002", 1, 1).unwrap();
        let placed = PlacementValidator::new()
            .place(&without_bracket, &op, &machines[0], at(9, 0))
            .unwrap();

        let conflicts = detect_conflicts(&orders, &machines, &placed.book);
        assert_eq!(
            conflicts,
            vec![Conflict::Overlap {
                job_a: existing,
                job_b: placed.job_id,
                machine: "M001".into(),
            }]
        );
        assert!(conflicts[0].involves(existing));
        assert!(conflicts[0].involves(placed.job_id));
    }

    #[test]
    fn test_touching_jobs_do_not_overlap() {
        let orders = orders();
        let machines = roster();
        let validator = PlacementValidator::new();
        let a = find_operation(&orders, "ORD001", 1, 1).unwrap();
        let b = find_operation(&orders, "ORD002", 1, 1).unwrap();

        let placed = validator.place(&JobBook::new(), &a, &machines[0], at(8, 0)).unwrap();
        let placed = validator.place(&placed.book, &b, &machines[0], at(10, 30)).unwrap();
        assert!(detect_conflicts(&orders, &machines, &placed.book).is_empty());
    }

    #[test]
    fn test_sequence_conflict_after_predecessor_moved() {
        let orders = orders();
        let machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;

        // Rebuild the book with step 1 moved later, keeping steps 2 and 3
        let mut jobs: Vec<Job> = book.into();
        let step1 = find_operation(&orders, "ORD001", 1, 1).unwrap();
        let idx = jobs.iter().position(|j| j.seq() == 1 && j.order_no() == "ORD001").unwrap();
        jobs[idx] = Job::new(jobs[idx].id(), &step1, "M002", at(12, 0)).unwrap();
        let book = JobBook::from(jobs);

        let conflicts = detect_conflicts(&orders, &machines, &book);
        let step2 = book.job_for("ORD001", 1, 2).unwrap();
        assert!(conflicts.contains(&Conflict::Sequence {
            job: step2.id(),
            predecessor: book.job_for("ORD001", 1, 1).unwrap().id(),
        }));
    }

    #[test]
    fn test_maintenance_conflict() {
        let orders = orders();
        let mut machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;

        machines[2].status = MachineStatus::Pm;
        let conflicts = detect_conflicts(&orders, &machines, &book);
        let assy = book.job_for("ORD001", 1, 3).unwrap().id();
        assert_eq!(
            conflicts,
            vec![Conflict::Maintenance {
                job: assy,
                machine: "M003".into(),
            }]
        );
    }

    #[test]
    fn test_capability_conflict_after_routing_change() {
        let mut orders = orders();
        let machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;

        // Routing edited upstream: M003 no longer rated for assembly
        orders[0].items[0].routing[2].machine_group = ["M004".to_string()].into();
        let conflicts = detect_conflicts(&orders, &machines, &book);
        assert_eq!(kinds(&conflicts), vec![ConflictKind::Capability]);
    }

    #[test]
    fn test_job_with_multiple_conflicts() {
        let orders = orders();
        let mut machines = roster();
        let validator = PlacementValidator::new();
        let a = find_operation(&orders, "ORD001", 1, 1).unwrap();
        let b = find_operation(&orders, "ORD002", 1, 1).unwrap();

        let placed = validator.place(&JobBook::new(), &a, &machines[0], at(8, 0)).unwrap();
        let placed = validator.place(&placed.book, &b, &machines[0], at(8, 15)).unwrap();
        machines[0].status = MachineStatus::Pm;

        let conflicts = detect_conflicts(&orders, &machines, &placed.book);
        assert_eq!(
            kinds(&conflicts),
            vec![
                ConflictKind::Overlap,
                ConflictKind::Maintenance,
                ConflictKind::Maintenance
            ]
        );
        let on_bracket = conflicts.iter().filter(|c| c.involves(placed.job_id)).count();
        assert_eq!(on_bracket, 2);
    }

    #[test]
    fn test_orphan_job_skips_capability() {
        let orders = orders();
        let machines = roster();
        let book = SimpleScheduler::new(at(8, 0))
            .schedule(&orders, &machines, &JobBook::new())
            .book;
        let conflicts = detect_conflicts(&orders[..1], &machines, &book);
        assert!(conflicts.is_empty());
        assert!(book.get(JobId(4)).is_some());
    }
}
