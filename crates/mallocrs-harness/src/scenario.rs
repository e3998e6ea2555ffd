//! Runs the six end-to-end walkthroughs against a fresh `MockOs`-backed
//! allocator each, reporting PASS/FAIL with a short diagnostic per scenario.

use mallocrs_core::header::{align_up, Status, ALIGN, HEADER};
use mallocrs_core::{Allocator, MockOs, PREALLOC};
use serde::Serialize;

use crate::invariants::check_invariants;

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

fn new_allocator() -> Allocator<MockOs> {
    Allocator::new(MockOs::default())
}

/// Runs all six scenarios and returns one outcome per scenario, in order.
pub fn run_scenarios() -> Vec<ScenarioOutcome> {
    vec![
        scenario_1_virgin_alloc_preallocates_and_splits(),
        scenario_2_best_fit_reuses_exact_freed_block(),
        scenario_3_coalescing_is_deferred_to_next_best_fit(),
        scenario_4_large_alloc_is_mapped_and_unmapped_exactly(),
        scenario_5_shrinking_realloc_keeps_pointer_and_splits_tail(),
        scenario_6_realloc_of_released_pointer_is_null(),
    ]
}

fn outcome(name: &str, passed: bool, detail: impl Into<String>) -> ScenarioOutcome {
    ScenarioOutcome {
        name: name.to_string(),
        passed,
        detail: detail.into(),
    }
}

fn scenario_1_virgin_alloc_preallocates_and_splits() -> ScenarioOutcome {
    let mut a = new_allocator();
    let p = a.alloc(100);
    if p.is_null() {
        return outcome("virgin-alloc-preallocates-and-splits", false, "alloc(100) returned null");
    }
    let nodes: Vec<_> = a.registry().iter().collect();
    if nodes.len() != 2 {
        return outcome(
            "virgin-alloc-preallocates-and-splits",
            false,
            format!("expected 2 registry nodes after first alloc, got {}", nodes.len()),
        );
    }
    // SAFETY: both nodes are live.
    unsafe {
        let expected_free = align_up(PREALLOC, ALIGN) - HEADER - align_up(100, ALIGN) - HEADER;
        if (*nodes[0]).status != Status::Allocated as u8
            || (*nodes[0]).size != align_up(100, ALIGN)
            || (*nodes[1]).status != Status::Free as u8
            || (*nodes[1]).size != expected_free
        {
            return outcome(
                "virgin-alloc-preallocates-and-splits",
                false,
                "split layout did not match [ALLOCATED size=104, FREE size=remainder]",
            );
        }
    }
    outcome("virgin-alloc-preallocates-and-splits", true, "preallocation split as expected")
}

fn scenario_2_best_fit_reuses_exact_freed_block() -> ScenarioOutcome {
    let mut a = new_allocator();
    let x = a.alloc(200);
    let _b = a.alloc(200);
    a.release(x);
    let c = a.alloc(200);
    if c == x {
        outcome("best-fit-reuses-exact-freed-block", true, "c == a, no split needed")
    } else {
        outcome("best-fit-reuses-exact-freed-block", false, "c != a")
    }
}

fn scenario_3_coalescing_is_deferred_to_next_best_fit() -> ScenarioOutcome {
    let mut a = new_allocator();
    let x = a.alloc(100);
    let y = a.alloc(100);
    a.release(x);
    a.release(y);
    let free_before = a
        .registry()
        .iter()
        // SAFETY: nodes are live.
        .filter(|&n| unsafe { (*n).status } == Status::Free as u8)
        .count();
    if free_before != 2 {
        return outcome(
            "coalescing-is-deferred-to-next-best-fit",
            false,
            format!("expected 2 un-merged FREE nodes after both releases, found {free_before}"),
        );
    }
    let served = a.alloc(150);
    if served.is_null() {
        return outcome("coalescing-is-deferred-to-next-best-fit", false, "alloc(150) failed to coalesce and serve");
    }
    outcome("coalescing-is-deferred-to-next-best-fit", true, "coalesced on next best-fit search")
}

fn scenario_4_large_alloc_is_mapped_and_unmapped_exactly() -> ScenarioOutcome {
    let mut a = new_allocator();
    let before = a.registry().iter().count();
    let p = a.alloc(200 * 1024);
    if p.is_null() {
        return outcome("large-alloc-is-mapped-and-unmapped-exactly", false, "large alloc returned null");
    }
    let unchanged = a.registry().iter().count() == before;
    a.release(p);
    if unchanged {
        outcome("large-alloc-is-mapped-and-unmapped-exactly", true, "mapped block bypassed the registry")
    } else {
        outcome("large-alloc-is-mapped-and-unmapped-exactly", false, "mapped block was linked into the registry")
    }
}

fn scenario_5_shrinking_realloc_keeps_pointer_and_splits_tail() -> ScenarioOutcome {
    let mut a = new_allocator();
    let p = a.alloc(100);
    let q = a.realloc(p, 50);
    if q == p {
        outcome("shrinking-realloc-keeps-pointer-and-splits-tail", true, "q == p")
    } else {
        outcome("shrinking-realloc-keeps-pointer-and-splits-tail", false, "q != p")
    }
}

fn scenario_6_realloc_of_released_pointer_is_null() -> ScenarioOutcome {
    let mut a = new_allocator();
    let p = a.alloc(100);
    a.release(p);
    let q = a.realloc(p, 200);
    let violations = check_invariants(&a);
    if q.is_null() && violations.is_empty() {
        outcome("realloc-of-released-pointer-is-null", true, "returned null, registry still consistent")
    } else if !q.is_null() {
        outcome("realloc-of-released-pointer-is-null", false, "realloc of a freed pointer did not return null")
    } else {
        outcome(
            "realloc-of-released-pointer-is-null",
            false,
            format!("{} registry invariant violation(s) after the call", violations.len()),
        )
    }
}
