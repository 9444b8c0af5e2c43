//! Input validation for the order book and machine roster.
//!
//! Checks structural integrity before planning. Detects:
//! - Duplicate order numbers, item numbers and machine codes
//! - Items without a routing
//! - Routings whose steps are not numbered 1, 2, 3, ...
//! - Steps with no eligible machine, or naming an unknown machine
//!
//! The scheduler tolerates all of these (it just leaves the affected
//! operations unscheduled); validation tells the caller why.

use crate::models::{Machine, Order};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identifier.
    DuplicateId,
    /// An item has no routing steps.
    EmptyRouting,
    /// Routing steps are not numbered contiguously from 1.
    InvalidSequence,
    /// A routing step lists no machines.
    EmptyMachineGroup,
    /// A routing step references a machine not in the roster.
    InvalidMachineReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the planning input.
///
/// Checks:
/// 1. No duplicate machine codes
/// 2. No duplicate order numbers
/// 3. No duplicate item numbers within an order
/// 4. Every item has at least one routing step
/// 5. Routing steps are numbered 1..=n in order
/// 6. Every step has at least one eligible machine
/// 7. Every eligible machine exists in the roster
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(orders: &[Order], machines: &[Machine]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut machine_codes = HashSet::new();
    for m in machines {
        if !machine_codes.insert(m.code.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine code: {}", m.code),
            ));
        }
    }

    let mut order_nos = HashSet::new();
    for order in orders {
        if !order_nos.insert(order.order_no.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate order number: {}", order.order_no),
            ));
        }

        let mut item_nos = HashSet::new();
        for item in &order.items {
            let label = format!("{}/{}", order.order_no, item.item_no);

            if !item_nos.insert(item.item_no) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate item number: {label}"),
                ));
            }

            if item.routing.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyRouting,
                    format!("Item '{label}' has no routing steps"),
                ));
            }

            for (idx, step) in item.routing.iter().enumerate() {
                let expected = idx as u32 + 1;
                if step.seq != expected {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidSequence,
                        format!(
                            "Item '{label}' step {} found where step {expected} was expected",
                            step.seq
                        ),
                    ));
                }

                if step.machine_group.is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyMachineGroup,
                        format!("Item '{label}' step {} has no eligible machine", step.seq),
                    ));
                }

                for code in &step.machine_group {
                    if !machine_codes.contains(code.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidMachineReference,
                            format!(
                                "Item '{label}' step {} references unknown machine '{code}'",
                                step.seq
                            ),
                        ));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
