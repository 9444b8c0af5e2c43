//! Job book: the arena holding every scheduled job.
//!
//! Jobs are keyed by [`JobId`] in an ordered map, so iteration order is
//! stable and two books built from the same inputs compare equal. A
//! secondary index maps each item to its scheduled steps (`seq → JobId`),
//! which makes predecessor lookups and cascade removal range queries
//! instead of list scans.
//!
//! Books are snapshots: operations that change the job set take `&self`
//! and return a new book, leaving the caller's snapshot untouched.
//!
//! On the wire a book is `{ "next_id": .., "jobs": [..] }`. The ID counter
//! travels with the jobs so a reloaded book never hands out an ID that was
//! already used; the item index is rebuilt on read.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{ItemKey, Job, JobId, Operation};

/// The set of scheduled jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JobBookRecord", into = "JobBookRecord")]
pub struct JobBook {
    jobs: BTreeMap<JobId, Job>,
    by_item: HashMap<ItemKey, BTreeMap<u32, JobId>>,
    next_id: u64,
}

/// Wire shape of a job book.
#[derive(Serialize, Deserialize)]
pub struct JobBookRecord {
    #[serde(default)]
    next_id: u64,
    jobs: Vec<Job>,
}

/// Result of a cascade removal.
#[derive(Debug, Clone)]
pub struct Removal {
    /// The book without the removed jobs.
    pub book: JobBook,
    /// Removed job IDs, in ascending `seq` order. Empty if the job was unknown.
    pub removed: Vec<JobId>,
}

impl JobBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self {
            jobs: BTreeMap::new(),
            by_item: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the book holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// All jobs, in ID order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Finds a job by ID.
    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Finds the job scheduled for `(order_no, item_no, seq)`.
    pub fn job_for(&self, order_no: &str, item_no: u32, seq: u32) -> Option<&Job> {
        let key = ItemKey::new(order_no, item_no);
        let id = self.by_item.get(&key)?.get(&seq)?;
        self.jobs.get(id)
    }

    /// Finds the job scheduled for an operation.
    pub fn job_for_operation(&self, op: &Operation<'_>) -> Option<&Job> {
        self.job_for(&op.order.order_no, op.item.item_no, op.step.seq)
    }

    /// Finds the job of the step preceding `op`, if `op` is not the first step.
    pub fn predecessor_of(&self, op: &Operation<'_>) -> Option<&Job> {
        match op.step.seq {
            0 | 1 => None,
            seq => self.job_for(&op.order.order_no, op.item.item_no, seq - 1),
        }
    }

    /// Finds the job of the step preceding `job`.
    pub fn predecessor_of_job(&self, job: &Job) -> Option<&Job> {
        match job.seq() {
            0 | 1 => None,
            seq => self.job_for(job.order_no(), job.item_no(), seq - 1),
        }
    }

    /// Whether `(order_no, item_no, seq)` has a job.
    pub fn is_scheduled(&self, order_no: &str, item_no: u32, seq: u32) -> bool {
        self.job_for(order_no, item_no, seq).is_some()
    }

    /// All jobs on a machine, in ID order.
    pub fn jobs_on_machine<'a>(&'a self, machine_code: &'a str) -> impl Iterator<Item = &'a Job> {
        self.jobs
            .values()
            .filter(move |j| j.machine_code() == machine_code)
    }

    /// All jobs of an item, in `seq` order.
    pub fn jobs_for_item(&self, key: &ItemKey) -> Vec<&Job> {
        self.by_item
            .get(key)
            .map(|steps| steps.values().filter_map(|id| self.jobs.get(id)).collect())
            .unwrap_or_default()
    }

    /// Reserves the next job ID.
    pub(crate) fn allocate_id(&mut self) -> JobId {
        let id = JobId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Inserts a job.
    ///
    /// Returns `false` and leaves the book unchanged when the job's
    /// operation or ID is already taken; every job stays reachable through
    /// the item index.
    pub(crate) fn insert(&mut self, job: Job) -> bool {
        if self.jobs.contains_key(&job.id())
            || self.is_scheduled(job.order_no(), job.item_no(), job.seq())
        {
            return false;
        }
        self.next_id = self.next_id.max(job.id().0 + 1);
        self.by_item
            .entry(job.item_key())
            .or_default()
            .insert(job.seq(), job.id());
        self.jobs.insert(job.id(), job);
        true
    }

    /// Removes a job and every later step of the same item.
    ///
    /// A later step cannot stay scheduled once its prerequisite is gone, so
    /// all dependents go in the same call.
    pub fn remove_cascade(&self, id: JobId) -> Removal {
        let Some(job) = self.jobs.get(&id) else {
            debug!(job = %id, "cascade removal of unknown job ignored");
            return Removal {
                book: self.clone(),
                removed: Vec::new(),
            };
        };

        let key = job.item_key();
        let removed: Vec<JobId> = self
            .by_item
            .get(&key)
            .map(|steps| steps.range(job.seq()..).map(|(_, id)| *id).collect())
            .unwrap_or_default();

        let mut book = self.clone();
        for rid in &removed {
            book.jobs.remove(rid);
        }
        if let Some(steps) = book.by_item.get_mut(&key) {
            steps.retain(|seq, _| *seq < job.seq());
            if steps.is_empty() {
                book.by_item.remove(&key);
            }
        }

        debug!(job = %id, removed = removed.len(), "cascade removal");
        Removal { book, removed }
    }
}

impl Default for JobBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a book from loose jobs. A job whose ID or operation is already
/// present is dropped with a warning.
impl From<Vec<Job>> for JobBook {
    fn from(jobs: Vec<Job>) -> Self {
        let mut book = JobBook::new();
        for job in jobs {
            let id = job.id();
            if !book.insert(job) {
                warn!(job = %id, "duplicate job dropped");
            }
        }
        book
    }
}

impl From<JobBook> for Vec<Job> {
    fn from(book: JobBook) -> Self {
        book.jobs.into_values().collect()
    }
}

impl From<JobBookRecord> for JobBook {
    fn from(record: JobBookRecord) -> Self {
        let mut book = JobBook::from(record.jobs);
        book.next_id = book.next_id.max(record.next_id);
        book
    }
}

impl From<JobBook> for JobBookRecord {
    fn from(book: JobBook) -> Self {
        Self {
            next_id: book.next_id,
            jobs: book.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Order, RoutingStep};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn three_step_order() -> Order {
        Order::new("ORD001", "ACME", NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(), 1).with_item(
            Item::new(1, "Widget A", 100)
                .with_step(RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001"]))
                .with_step(RoutingStep::new(2, "DRILL", 20, 60).with_machines(["M001"]))
                .with_step(RoutingStep::new(3, "ASSY", 15, 90).with_machines(["M003"])),
        )
    }

    fn full_book(order: &Order) -> JobBook {
        let mut book = JobBook::new();
        let mut start = at(8, 0);
        for op in order.operations() {
            let id = book.allocate_id();
            let job = Job::new(id, &op, "M001", start).unwrap();
            start = job.end();
            assert!(book.insert(job));
        }
        book
    }

    #[test]
    fn test_insert_and_lookup() {
        let order = three_step_order();
        let book = full_book(&order);

        assert_eq!(book.len(), 3);
        let second = book.job_for("ORD001", 1, 2).unwrap();
        assert_eq!(second.id(), JobId(2));
        assert_eq!(book.predecessor_of_job(second).unwrap().id(), JobId(1));
        assert!(book.is_scheduled("ORD001", 1, 3));
        assert!(!book.is_scheduled("ORD001", 2, 1));
        assert_eq!(book.jobs_on_machine("M001").count(), 3);
    }

    #[test]
    fn test_cascade_from_first_step() {
        let order = three_step_order();
        let book = full_book(&order);

        let removal = book.remove_cascade(JobId(1));
        assert_eq!(removal.removed, vec![JobId(1), JobId(2), JobId(3)]);
        assert!(removal.book.is_empty());
        // Original snapshot untouched
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn test_cascade_from_middle_step() {
        let order = three_step_order();
        let book = full_book(&order);

        let removal = book.remove_cascade(JobId(2));
        assert_eq!(removal.removed, vec![JobId(2), JobId(3)]);
        assert_eq!(removal.book.len(), 1);
        assert!(removal.book.is_scheduled("ORD001", 1, 1));
        assert!(!removal.book.is_scheduled("ORD001", 1, 2));
    }

    #[test]
    fn test_cascade_terminal_step() {
        let order = three_step_order();
        let book = full_book(&order);

        let removal = book.remove_cascade(JobId(3));
        assert_eq!(removal.removed, vec![JobId(3)]);
        assert_eq!(removal.book.len(), 2);
    }

    #[test]
    fn test_cascade_unknown_job() {
        let order = three_step_order();
        let book = full_book(&order);

        let removal = book.remove_cascade(JobId(99));
        assert!(removal.removed.is_empty());
        assert_eq!(removal.book, book);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let order = three_step_order();
        let book = full_book(&order);

        let mut after = book.remove_cascade(JobId(3)).book;
        assert_eq!(after.allocate_id(), JobId(4));
    }

    #[test]
    fn test_serde_rebuilds_index() {
        let order = three_step_order();
        let book = full_book(&order);

        let json = serde_json::to_string(&book).unwrap();
        let mut back: JobBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
        assert_eq!(back.job_for("ORD001", 1, 3).unwrap().id(), JobId(3));
        assert_eq!(back.allocate_id(), JobId(4));
    }

    #[test]
    fn test_serde_keeps_id_counter_after_removal() {
        let order = three_step_order();
        let after = full_book(&order).remove_cascade(JobId(3)).book;

        let value = serde_json::to_value(&after).unwrap();
        assert_eq!(value["next_id"], 4);
        let mut back: JobBook = serde_json::from_value(value).unwrap();
        assert_eq!(back, after);
        assert_eq!(back.allocate_id(), JobId(4));
    }

    #[test]
    fn test_serde_counter_never_below_jobs() {
        let order = three_step_order();
        let mut value = serde_json::to_value(full_book(&order)).unwrap();
        value["next_id"] = serde_json::json!(1);

        let mut back: JobBook = serde_json::from_value(value).unwrap();
        assert_eq!(back.allocate_id(), JobId(4));
    }

    #[test]
    fn test_default_is_new() {
        let mut book = JobBook::default();
        assert_eq!(book, JobBook::new());
        assert_eq!(book.allocate_id(), JobId(1));
    }

    #[test]
    fn test_duplicate_operation_not_indexed_twice() {
        let order = three_step_order();
        let mut book = full_book(&order);
        let first = order.operations().next().unwrap();

        let id = book.allocate_id();
        let again = Job::new(id, &first, "M002", at(14, 0)).unwrap();
        assert!(!book.insert(again.clone()));
        assert_eq!(book.len(), 3);
        assert_eq!(book.job_for("ORD001", 1, 1).unwrap().id(), JobId(1));

        let mut jobs: Vec<Job> = book.clone().into();
        jobs.push(again);
        assert_eq!(JobBook::from(jobs).len(), 3);
    }
}
