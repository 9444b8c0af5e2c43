//! Conflict model.
//!
//! A conflict is a detected violation of a scheduling invariant. Conflicts
//! are advisory data: they never block the edit that caused them and are
//! recomputed from scratch after every change.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::JobId;

/// A detected constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Conflict {
    /// Two jobs occupy the same machine at the same time. `job_a < job_b`.
    Overlap {
        job_a: JobId,
        job_b: JobId,
        machine: String,
    },
    /// A job starts before its predecessor step ends.
    Sequence { job: JobId, predecessor: JobId },
    /// A job sits on a machine under preventive maintenance.
    Maintenance { job: JobId, machine: String },
    /// A job sits on a machine outside its step's machine group.
    Capability {
        job: JobId,
        machine: String,
        process: String,
    },
}

/// Conflict classification, for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConflictKind {
    Overlap,
    Sequence,
    Maintenance,
    Capability,
}

impl Conflict {
    pub fn kind(&self) -> ConflictKind {
        match self {
            Self::Overlap { .. } => ConflictKind::Overlap,
            Self::Sequence { .. } => ConflictKind::Sequence,
            Self::Maintenance { .. } => ConflictKind::Maintenance,
            Self::Capability { .. } => ConflictKind::Capability,
        }
    }

    /// Jobs this conflict is reported against.
    ///
    /// A sequence conflict is reported against the late job only; its
    /// predecessor is context.
    pub fn job_ids(&self) -> Vec<JobId> {
        match self {
            Self::Overlap { job_a, job_b, .. } => vec![*job_a, *job_b],
            Self::Sequence { job, .. }
            | Self::Maintenance { job, .. }
            | Self::Capability { job, .. } => vec![*job],
        }
    }

    /// Whether this conflict is reported against `job`.
    pub fn involves(&self, job: JobId) -> bool {
        self.job_ids().contains(&job)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap {
                job_a,
                job_b,
                machine,
            } => write!(f, "{job_a} and {job_b} overlap on machine {machine}"),
            Self::Sequence { job, predecessor } => {
                write!(f, "{job} starts before predecessor {predecessor} ends")
            }
            Self::Maintenance { job, machine } => {
                write!(f, "{job} is on machine {machine}, which is under maintenance")
            }
            Self::Capability {
                job,
                machine,
                process,
            } => write!(f, "{job}: machine {machine} cannot perform process {process}"),
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Overlap => "overlap",
            Self::Sequence => "sequence",
            Self::Maintenance => "maintenance",
            Self::Capability => "capability",
        };
        f.write_str(name)
    }
}
