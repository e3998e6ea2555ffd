//! Pseudo-randomized alloc/release/realloc stress runner. Checks the
//! registry invariants after every operation and stops at the first
//! violation, recording enough of the operation log to reproduce it.

use mallocrs_core::{Allocator, MockOs};
use serde::Serialize;

use crate::invariants::{check_invariants, InvariantViolation};

#[derive(Debug, Clone, Copy, Serialize)]
pub enum LoggedOp {
    Alloc { size: usize },
    Release { index: usize },
    Realloc { index: usize, new_size: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub seed: u64,
    pub iterations_requested: u64,
    pub iterations_run: u64,
    pub passed: bool,
    pub violations: Vec<InvariantViolation>,
    /// The operation sequence, truncated to the failing iteration if the run failed.
    pub log: Vec<LoggedOp>,
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.state
    }
}

/// Runs `iterations` pseudo-randomized operations seeded by `seed`,
/// checking registry invariants after each one. Stops early at the first
/// violation.
pub fn run_stress(seed: u64, iterations: u64) -> StressReport {
    let mut a = Allocator::new(MockOs::default());
    let mut live: Vec<*mut u8> = Vec::new();
    let mut rng = Lcg::new(seed);
    let mut log = Vec::new();

    for i in 0..iterations {
        let choice = rng.next_u64() % 3;
        match choice {
            0 => {
                let size = 1 + (rng.next_u64() % 2048) as usize;
                let p = a.alloc(size);
                log.push(LoggedOp::Alloc { size });
                if !p.is_null() {
                    live.push(p);
                }
            }
            1 if !live.is_empty() => {
                let index = (rng.next_u64() as usize) % live.len();
                let p = live.swap_remove(index);
                a.release(p);
                log.push(LoggedOp::Release { index });
            }
            2 if !live.is_empty() => {
                let index = (rng.next_u64() as usize) % live.len();
                let p = live[index];
                let new_size = 1 + (rng.next_u64() % 2048) as usize;
                let q = a.realloc(p, new_size);
                log.push(LoggedOp::Realloc { index, new_size });
                if q.is_null() {
                    live.swap_remove(index);
                } else {
                    live[index] = q;
                }
            }
            _ => {}
        }

        let violations = check_invariants(&a);
        if !violations.is_empty() {
            return StressReport {
                seed,
                iterations_requested: iterations,
                iterations_run: i + 1,
                passed: false,
                violations,
                log,
            };
        }
    }

    StressReport {
        seed,
        iterations_requested: iterations,
        iterations_run: iterations,
        passed: true,
        violations: Vec::new(),
        log: Vec::new(),
    }
}
