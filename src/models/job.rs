//! Job model.
//!
//! A job is a concrete machine × time assignment of one operation. Jobs are
//! immutable: a change of machine or time is a removal followed by a new job.
//!
//! # Duration
//! `end - start == setup_min + run_min` always holds; the constructor
//! derives `end` and the fields are only readable through accessors.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ItemKey, Operation};
use crate::error::TimeRangeError;

/// Job identifier, allocated by the [`JobBook`](super::JobBook).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JOB-{:05}", self.0)
    }
}

/// A scheduled operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "JobRecord", into = "JobRecord")]
pub struct Job {
    id: JobId,
    order_no: String,
    item_no: u32,
    seq: u32,
    process: String,
    machine_code: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    setup_min: u32,
    run_min: u32,
}

/// Wire shape of a job. `end` is written for consumers but recomputed on read,
/// and a record whose end would fall off the calendar is rejected.
#[derive(Serialize, Deserialize)]
pub struct JobRecord {
    job_id: JobId,
    order_no: String,
    item_no: u32,
    seq: u32,
    process: String,
    machine_code: String,
    start: NaiveDateTime,
    #[serde(default, skip_deserializing)]
    end: Option<NaiveDateTime>,
    setup_min: u32,
    run_min: u32,
}

impl Job {
    /// Creates a job for `op` on `machine_code` starting at `start`.
    ///
    /// Fails when `start + setup + run` is past the last representable
    /// instant.
    pub fn new(
        id: JobId,
        op: &Operation<'_>,
        machine_code: impl Into<String>,
        start: NaiveDateTime,
    ) -> Result<Self, TimeRangeError> {
        Self::from_parts(
            id,
            op.order.order_no.clone(),
            op.item.item_no,
            op.step.seq,
            op.step.process.clone(),
            machine_code.into(),
            start,
            op.step.setup_min,
            op.step.run_min,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn from_parts(
        id: JobId,
        order_no: String,
        item_no: u32,
        seq: u32,
        process: String,
        machine_code: String,
        start: NaiveDateTime,
        setup_min: u32,
        run_min: u32,
    ) -> Result<Self, TimeRangeError> {
        let minutes = u64::from(setup_min) + u64::from(run_min);
        let end = i64::try_from(minutes)
            .ok()
            .and_then(|m| start.checked_add_signed(Duration::minutes(m)))
            .ok_or(TimeRangeError { start, minutes })?;
        Ok(Self {
            id,
            order_no,
            item_no,
            seq,
            process,
            machine_code,
            start,
            end,
            setup_min,
            run_min,
        })
    }

    #[inline]
    pub fn id(&self) -> JobId {
        self.id
    }

    #[inline]
    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    #[inline]
    pub fn item_no(&self) -> u32 {
        self.item_no
    }

    #[inline]
    pub fn seq(&self) -> u32 {
        self.seq
    }

    #[inline]
    pub fn process(&self) -> &str {
        &self.process
    }

    #[inline]
    pub fn machine_code(&self) -> &str {
        &self.machine_code
    }

    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// End of the setup portion, `[start, setup_end)`.
    ///
    /// Never past `end`, so the addition stays in range.
    #[inline]
    pub fn setup_end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.setup_min))
    }

    #[inline]
    pub fn setup_min(&self) -> u32 {
        self.setup_min
    }

    #[inline]
    pub fn run_min(&self) -> u32 {
        self.run_min
    }

    /// Identity of the item this job belongs to.
    pub fn item_key(&self) -> ItemKey {
        ItemKey::new(&self.order_no, self.item_no)
    }

    /// Whether `[start, end)` of both jobs intersect.
    pub fn overlaps(&self, other: &Job) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl TryFrom<JobRecord> for Job {
    type Error = TimeRangeError;

    fn try_from(r: JobRecord) -> Result<Self, Self::Error> {
        Self::from_parts(
            r.job_id,
            r.order_no,
            r.item_no,
            r.seq,
            r.process,
            r.machine_code,
            r.start,
            r.setup_min,
            r.run_min,
        )
    }
}

impl From<Job> for JobRecord {
    fn from(j: Job) -> Self {
        Self {
            job_id: j.id,
            order_no: j.order_no,
            item_no: j.item_no,
            seq: j.seq,
            process: j.process,
            machine_code: j.machine_code,
            start: j.start,
            end: Some(j.end),
            setup_min: j.setup_min,
            run_min: j.run_min,
        }
    }
}
