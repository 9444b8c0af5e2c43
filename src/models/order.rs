//! Order, item and routing models.
//!
//! An order carries one or more items; each item carries a fixed routing,
//! the ordered list of process steps needed to produce it. Orders are
//! created upstream (order entry) and are read-only to the planner.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A manufacturing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order number (e.g., "ORD001").
    pub order_no: String,
    /// Customer name.
    pub customer: String,
    /// Delivery due date.
    pub due_date: NaiveDate,
    /// Scheduling priority (lower = more urgent).
    pub priority: i32,
    /// Ordered items.
    pub items: Vec<Item>,
}

/// A line item within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item number, unique within its order.
    pub item_no: u32,
    /// Product name.
    pub product: String,
    /// Quantity ordered.
    pub qty: u32,
    /// Process steps, sorted by `seq`.
    pub routing: Vec<RoutingStep>,
    /// Production status.
    pub status: ItemStatus,
}

/// Production status of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// One step of an item's routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStep {
    /// Position within the routing (1-based, contiguous).
    pub seq: u32,
    /// Process code (e.g., "MACH", "DRILL").
    pub process: String,
    /// Human-readable process name.
    pub process_name: String,
    /// Setup time (minutes).
    pub setup_min: u32,
    /// Run time (minutes).
    pub run_min: u32,
    /// Codes of the machines able to perform this step.
    pub machine_group: BTreeSet<String>,
}

/// Identity of an item across the order book: `(order_no, item_no)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub order_no: String,
    pub item_no: u32,
}

/// A routing step bound to its parent order and item.
///
/// This is the unit the scheduler and the placement validator work on.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    pub order: &'a Order,
    pub item: &'a Item,
    pub step: &'a RoutingStep,
}

impl Order {
    /// Creates an order with no items.
    pub fn new(
        order_no: impl Into<String>,
        customer: impl Into<String>,
        due_date: NaiveDate,
        priority: i32,
    ) -> Self {
        Self {
            order_no: order_no.into(),
            customer: customer.into(),
            due_date,
            priority,
            items: Vec::new(),
        }
    }

    /// Adds an item.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Finds an item by number.
    pub fn item(&self, item_no: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.item_no == item_no)
    }

    /// Due date as an instant (00:00 of the due day).
    pub fn due_instant(&self) -> NaiveDateTime {
        self.due_date.and_time(NaiveTime::MIN)
    }

    /// All operations of this order, in item then routing order.
    pub fn operations(&self) -> impl Iterator<Item = Operation<'_>> {
        self.items.iter().flat_map(move |item| {
            item.routing.iter().map(move |step| Operation {
                order: self,
                item,
                step,
            })
        })
    }

    /// Number of routing steps across all items.
    pub fn operation_count(&self) -> usize {
        self.items.iter().map(|i| i.routing.len()).sum()
    }
}

impl Item {
    /// Creates an item with an empty routing.
    pub fn new(item_no: u32, product: impl Into<String>, qty: u32) -> Self {
        Self {
            item_no,
            product: product.into(),
            qty,
            routing: Vec::new(),
            status: ItemStatus::Pending,
        }
    }

    /// Appends a routing step.
    pub fn with_step(mut self, step: RoutingStep) -> Self {
        self.routing.push(step);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    /// Finds the routing step with the given sequence number.
    pub fn step(&self, seq: u32) -> Option<&RoutingStep> {
        self.routing.iter().find(|s| s.seq == seq)
    }
}

impl RoutingStep {
    /// Creates a routing step with no eligible machines.
    pub fn new(seq: u32, process: impl Into<String>, setup_min: u32, run_min: u32) -> Self {
        Self {
            seq,
            process: process.into(),
            process_name: String::new(),
            setup_min,
            run_min,
            machine_group: BTreeSet::new(),
        }
    }

    /// Sets the process name.
    pub fn with_process_name(mut self, name: impl Into<String>) -> Self {
        self.process_name = name.into();
        self
    }

    /// Sets the eligible machines.
    pub fn with_machines<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.machine_group = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the given machine may perform this step.
    #[inline]
    pub fn accepts(&self, machine_code: &str) -> bool {
        self.machine_group.contains(machine_code)
    }

    /// Setup plus run time (minutes).
    #[inline]
    pub fn total_min(&self) -> u32 {
        self.setup_min + self.run_min
    }
}

impl ItemKey {
    pub fn new(order_no: impl Into<String>, item_no: u32) -> Self {
        Self {
            order_no: order_no.into(),
            item_no,
        }
    }
}

impl Operation<'_> {
    /// Identity of the owning item.
    pub fn item_key(&self) -> ItemKey {
        ItemKey::new(&self.order.order_no, self.item.item_no)
    }

    /// Sequence number of the step.
    #[inline]
    pub fn seq(&self) -> u32 {
        self.step.seq
    }
}

/// Finds the operation `(order_no, item_no, seq)` in an order book.
pub fn find_operation<'a>(
    orders: &'a [Order],
    order_no: &str,
    item_no: u32,
    seq: u32,
) -> Option<Operation<'a>> {
    let order = orders.iter().find(|o| o.order_no == order_no)?;
    let item = order.item(item_no)?;
    let step = item.step(seq)?;
    Some(Operation { order, item, step })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_order() -> Order {
        Order::new(
            "ORD001",
            "ACME",
            NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
            1,
        )
        .with_item(
            Item::new(1, "Widget A", 100)
                .with_step(RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001", "M002"]))
                .with_step(RoutingStep::new(2, "DRILL", 20, 60).with_machines(["M001", "M002"])),
        )
    }

    #[test]
    fn test_order_operations() {
        let order = widget_order();
        let ops: Vec<_> = order.operations().map(|op| op.seq()).collect();
        assert_eq!(ops, vec![1, 2]);
        assert_eq!(order.operation_count(), 2);
    }

    #[test]
    fn test_due_instant_is_midnight() {
        let order = widget_order();
        assert_eq!(order.due_instant().to_string(), "2025-10-03 00:00:00");
    }

    #[test]
    fn test_step_accepts() {
        let step = RoutingStep::new(1, "MACH", 30, 120).with_machines(["M001"]);
        assert!(step.accepts("M001"));
        assert!(!step.accepts("M003"));
        assert_eq!(step.total_min(), 150);
    }

    #[test]
    fn test_find_operation() {
        let orders = vec![widget_order()];
        let op = find_operation(&orders, "ORD001", 1, 2).unwrap();
        assert_eq!(op.step.process, "DRILL");
        assert_eq!(op.item_key(), ItemKey::new("ORD001", 1));
        assert!(find_operation(&orders, "ORD001", 1, 3).is_none());
        assert!(find_operation(&orders, "ORD999", 1, 1).is_none());
    }
}
