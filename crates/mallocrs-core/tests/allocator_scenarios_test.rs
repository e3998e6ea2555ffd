//! End-to-end scenarios against a `MockOs`-backed allocator, covering the
//! six walkthroughs and the registry invariants they must preserve.

use mallocrs_core::header::{align_up, Header, Status, ALIGN, HEADER};
use mallocrs_core::{Allocator, MockOs, PREALLOC};

fn new_allocator() -> Allocator<MockOs> {
    Allocator::new(MockOs::default())
}

/// Invariants 1-3 from §8, checked after a sequence of public calls.
fn assert_registry_invariants(a: &Allocator<MockOs>) {
    let nodes: Vec<*mut Header> = a.registry().iter().collect();
    for pair in nodes.windows(2) {
        let (x, y) = (pair[0], pair[1]);
        assert!((x as usize) < (y as usize), "invariant 1: ascending address order");
        // SAFETY: both nodes are live registry members.
        unsafe {
            assert_eq!(
                x as usize + HEADER + (*x).size,
                y as usize,
                "invariant 2: arena blocks are physically contiguous"
            );
            let both_free = (*x).status == Status::Free as u8 && (*y).status == Status::Free as u8;
            assert!(!both_free, "invariant 3: no two adjacent FREE arena blocks");
        }
    }
}

#[test]
fn scenario_1_virgin_alloc_preallocates_and_splits() {
    let mut a = new_allocator();
    let p = a.alloc(100);
    assert!(!p.is_null());

    let nodes: Vec<*mut Header> = a.registry().iter().collect();
    assert_eq!(nodes.len(), 2);
    // SAFETY: both nodes are live.
    unsafe {
        assert_eq!((*nodes[0]).status, Status::Allocated as u8);
        assert_eq!((*nodes[0]).size, align_up(100, ALIGN));
        assert_eq!((*nodes[1]).status, Status::Free as u8);
        assert_eq!(
            (*nodes[1]).size,
            align_up(PREALLOC, ALIGN) - HEADER - align_up(100, ALIGN) - HEADER
        );
    }
    assert_registry_invariants(&a);
}

#[test]
fn scenario_2_best_fit_reuses_exact_freed_block() {
    let mut a = new_allocator();
    let x = a.alloc(200);
    let y = a.alloc(200);
    a.release(x);
    let z = a.alloc(200);
    assert_eq!(z, x, "exact-size reuse needs no split");
    let _ = y;
    assert_registry_invariants(&a);
}

#[test]
fn scenario_3_coalescing_is_deferred_to_next_best_fit() {
    let mut a = new_allocator();
    let x = a.alloc(100);
    let y = a.alloc(100);
    a.release(x);
    a.release(y);

    let free_count = a
        .registry()
        .iter()
        // SAFETY: nodes are live.
        .filter(|&n| unsafe { (*n).status } == Status::Free as u8)
        .count();
    assert_eq!(free_count, 2, "releases never eagerly coalesce");

    let _ = a.alloc(150);
    let free_count_after = a
        .registry()
        .iter()
        // SAFETY: nodes are live.
        .filter(|&n| unsafe { (*n).status } == Status::Free as u8)
        .count();
    assert_eq!(free_count_after, 1, "best-fit coalesces before searching");
    assert_registry_invariants(&a);
}

#[test]
fn scenario_4_large_alloc_is_mapped_and_unmapped_exactly() {
    let mut a = new_allocator();
    let before = a.registry().iter().count();
    let p = a.alloc(200 * 1024);
    assert!(!p.is_null());
    assert_eq!(a.registry().iter().count(), before, "mapped blocks never enter the registry");
    a.release(p);
    assert_registry_invariants(&a);
}

#[test]
fn scenario_5_shrinking_realloc_keeps_pointer_and_splits_tail() {
    let mut a = new_allocator();
    let p = a.alloc(100);
    let q = a.realloc(p, 50);
    assert_eq!(q, p);
    assert_registry_invariants(&a);
}

#[test]
fn scenario_6_realloc_of_released_pointer_is_null_not_fatal() {
    let mut a = new_allocator();
    let p = a.alloc(100);
    a.release(p);
    let q = a.realloc(p, 200);
    assert!(q.is_null());
    assert_registry_invariants(&a);
}

#[test]
fn law_release_then_alloc_stays_within_arena_without_growing_break() {
    let mut a = new_allocator();
    let p = a.alloc(4096);
    a.release(p);
    let q = a.alloc(4096);
    assert_eq!(q, p);
}

#[test]
fn law_zalloc_payload_is_fully_zeroed() {
    let mut a = new_allocator();
    let p = a.zalloc(64, 16);
    assert!(!p.is_null());
    // SAFETY: `p` is valid for 1024 bytes.
    let bytes = unsafe { core::slice::from_raw_parts(p, 1024) };
    assert!(bytes.iter().all(|&b| b == 0));
}

#[test]
fn law_distinct_live_allocations_never_overlap() {
    let mut a = new_allocator();
    let mut live = Vec::new();
    for i in 0..64 {
        let size = 8 + (i % 37) * 16;
        let p = a.alloc(size);
        assert!(!p.is_null());
        live.push((p as usize, align_up(size, ALIGN)));
    }
    live.sort_by_key(|&(addr, _)| addr);
    for pair in live.windows(2) {
        let (addr_a, size_a) = pair[0];
        let (addr_b, _) = pair[1];
        assert!(addr_a + size_a <= addr_b, "live payload regions must not overlap");
    }
    assert_registry_invariants(&a);
}

#[test]
fn stress_sequence_preserves_registry_invariants_throughout() {
    let mut a = new_allocator();
    let mut live: Vec<*mut u8> = Vec::new();
    let mut rng: u64 = 0x1234_5678_9abc_def0;
    let mut lcg = move || {
        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        rng
    };

    for _ in 0..2000 {
        let r = lcg();
        match r % 3 {
            0 => {
                let size = 1 + (lcg() % 2048) as usize;
                let p = a.alloc(size);
                if !p.is_null() {
                    live.push(p);
                }
            }
            1 if !live.is_empty() => {
                let idx = (lcg() as usize) % live.len();
                let p = live.swap_remove(idx);
                a.release(p);
            }
            2 if !live.is_empty() => {
                let idx = (lcg() as usize) % live.len();
                let p = live[idx];
                let new_size = 1 + (lcg() % 2048) as usize;
                let q = a.realloc(p, new_size);
                if !q.is_null() {
                    live[idx] = q;
                } else {
                    live.swap_remove(idx);
                }
            }
            _ => {}
        }
        assert_registry_invariants(&a);
    }
}
