//! Production scheduling core for manufacturing planning boards.
//!
//! Assigns the routing steps of manufacturing orders to machines over time,
//! respecting step order, machine capability and maintenance, and reports
//! what a manual edit broke. Everything is a pure function over snapshots:
//! callers pass in orders, machines and the current job book and get a new
//! job book, conflicts or KPIs back. There is no I/O and no hidden state.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Order`, `Item`, `RoutingStep`, `Machine`,
//!   `Job`, `JobBook`, `Conflict`
//! - **`scheduler`**: Greedy list scheduler (`SimpleScheduler`) and `PlanKpi`
//! - **`placement`**: Manual placement validator
//! - **`conflicts`**: Overlap / sequence / maintenance / capability detection
//! - **`validation`**: Input integrity checks (duplicate IDs, routing gaps, machine refs)
//! - **`board`**: `PlanBoard`, a single-owner snapshot tying the above together
//! - **`config`**, **`error`**, **`logging`**: Ambient plumbing
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_planboard::board::PlanBoard;
//! use u_planboard::config::PlannerConfig;
//! use u_planboard::models::{Item, Machine, Order, RoutingStep};
//!
//! let order = Order::new("ORD001", "ACME", NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(), 1)
//!     .with_item(
//!         Item::new(1, "Widget A", 100)
//!             .with_step(RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001", "M002"]))
//!             .with_step(RoutingStep::new(2, "ASSY", 15, 90).with_machines(["M003"])),
//!     );
//! let machines = vec![Machine::new("M001"), Machine::new("M002"), Machine::new("M003")];
//! let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//!
//! let mut board = PlanBoard::new(vec![order], machines, PlannerConfig::new(start));
//! board.auto_plan();
//! assert!(board.conflicts().is_empty());
//! assert_eq!(board.kpi().scheduled_count, 2);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

pub mod board;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod logging;
pub mod models;
pub mod placement;
pub mod scheduler;
pub mod validation;
