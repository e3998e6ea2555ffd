#![no_main]

use libfuzzer_sys::fuzz_target;
use mallocrs_core::header::{Header, Status, HEADER};
use mallocrs_core::{Allocator, MockOs};

/// Interprets arbitrary bytes as a sequence of alloc/free operations against
/// a `MockOs`-backed allocator, checking the registry invariants (§8.1-3 of
/// the registry walkthrough) after every step. A panic here is a real bug:
/// the mock never fails allocation short of its fixed arena capacity, so
/// every operation should leave the registry in a consistent state.
fuzz_target!(|data: &[u8]| {
    let mut allocator = Allocator::new(MockOs::default());
    let mut live: Vec<*mut u8> = Vec::new();

    for chunk in data.chunks(3) {
        if chunk.len() < 3 {
            break;
        }
        match chunk[0] % 2 {
            0 => {
                let size = u16::from_le_bytes([chunk[1], chunk[2]]) as usize;
                let p = allocator.alloc(size);
                if !p.is_null() {
                    live.push(p);
                }
            }
            _ => {
                if live.is_empty() {
                    continue;
                }
                let index = (chunk[1] as usize) % live.len();
                let p = live.swap_remove(index);
                allocator.release(p);
            }
        }
        assert_registry_invariants(&allocator);
    }

    for p in live {
        allocator.release(p);
    }
});

fn assert_registry_invariants(a: &Allocator<MockOs>) {
    let nodes: Vec<*mut Header> = a.registry().iter().collect();
    for pair in nodes.windows(2) {
        let (x, y) = (pair[0], pair[1]);
        assert!((x as usize) < (y as usize));
        // SAFETY: both nodes are live registry members for the duration of this check.
        unsafe {
            assert_eq!(x as usize + HEADER + (*x).size, y as usize);
            assert!(!((*x).status == Status::Free as u8 && (*y).status == Status::Free as u8));
        }
    }
}
