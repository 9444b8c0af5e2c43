//! Machine model.
//!
//! Machines are the resources that perform routing steps. A machine's live
//! `status` is the only availability gate the planner looks at: a machine
//! under preventive maintenance (`PM`) receives no new work.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A machine on the shop floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine code (e.g., "M001").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Work center the machine belongs to.
    pub work_center: String,
    /// Live status.
    pub status: MachineStatus,
    /// Process codes the machine is rated for. Descriptive only: eligibility
    /// is decided by each routing step's machine group.
    pub processes: BTreeSet<String>,
}

/// Live machine status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineStatus {
    #[default]
    Idle,
    Run,
    /// Preventive maintenance: unavailable for new work.
    #[serde(rename = "PM")]
    Pm,
}

impl Machine {
    /// Creates an idle machine.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            work_center: String::new(),
            status: MachineStatus::Idle,
            processes: BTreeSet::new(),
        }
    }

    /// Sets the machine name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the work center.
    pub fn with_work_center(mut self, work_center: impl Into<String>) -> Self {
        self.work_center = work_center.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: MachineStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a process code.
    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.processes.insert(process.into());
        self
    }

    /// Whether the machine is under maintenance.
    #[inline]
    pub fn in_maintenance(&self) -> bool {
        self.status == MachineStatus::Pm
    }

    /// Whether the machine can take new work.
    #[inline]
    pub fn is_available(&self) -> bool {
        !self.in_maintenance()
    }
}

/// Finds a machine by code.
pub fn find_machine<'a>(machines: &'a [Machine], code: &str) -> Option<&'a Machine> {
    machines.iter().find(|m| m.code == code)
}
