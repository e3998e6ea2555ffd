//! Conformance and property-testing harness for mallocrs.
//!
//! Everything here runs against [`mallocrs_core::MockOs`] — this crate never
//! touches a live process break. It drives the allocator through both
//! scripted end-to-end scenarios and pseudo-randomized operation sequences,
//! checking the registry invariants after every step.

pub mod invariants;
pub mod scenario;
pub mod stress;

pub use invariants::{check_invariants, InvariantViolation};
pub use scenario::{run_scenarios, ScenarioOutcome};
pub use stress::{run_stress, StressReport};
