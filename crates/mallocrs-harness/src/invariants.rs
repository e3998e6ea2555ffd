//! Registry invariant checks shared by the `scenario` and `stress` subcommands.

use mallocrs_core::header::{Header, Status, HEADER};
use mallocrs_core::{Allocator, MockOs};
use serde::Serialize;

/// A single invariant failure, with enough context to reproduce it.
#[derive(Debug, Clone, Serialize)]
pub struct InvariantViolation {
    pub invariant: String,
    pub detail: String,
}

/// Checks invariants 1-3 from the registry walkthrough (address order,
/// physical contiguity, no two adjacent FREE blocks). Returns every
/// violation found rather than stopping at the first.
pub fn check_invariants(allocator: &Allocator<MockOs>) -> Vec<InvariantViolation> {
    let nodes: Vec<*mut Header> = allocator.registry().iter().collect();
    let mut violations = Vec::new();

    for pair in nodes.windows(2) {
        let (x, y) = (pair[0], pair[1]);
        if (x as usize) >= (y as usize) {
            violations.push(InvariantViolation {
                invariant: "ascending-address-order".to_string(),
                detail: format!("node {x:?} does not precede node {y:?}"),
            });
            continue;
        }
        // SAFETY: both nodes are live registry members for the duration of this check.
        unsafe {
            let expected_next = x as usize + HEADER + (*x).size;
            if expected_next != y as usize {
                violations.push(InvariantViolation {
                    invariant: "physical-contiguity".to_string(),
                    detail: format!(
                        "node {x:?} (size={}) ends at {expected_next:#x} but next node starts at {:#x}",
                        (*x).size,
                        y as usize
                    ),
                });
            }
            if (*x).status == Status::Free as u8 && (*y).status == Status::Free as u8 {
                violations.push(InvariantViolation {
                    invariant: "no-adjacent-free-blocks".to_string(),
                    detail: format!("nodes {x:?} and {y:?} are both FREE and adjacent"),
                });
            }
        }
    }
    violations
}
