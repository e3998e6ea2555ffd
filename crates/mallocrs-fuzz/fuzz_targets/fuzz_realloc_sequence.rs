#![no_main]

use libfuzzer_sys::fuzz_target;
use mallocrs_core::{Allocator, MockOs};

/// Drives a single live pointer through a chain of `realloc` calls sized
/// from the fuzz input, confirming the allocator never hands back a
/// misaligned pointer and never loses track of the live allocation (every
/// non-null result must differ from every pointer already retired into
/// `graveyard`, since reuse of a still-live address would mean two live
/// allocations now alias the same bytes).
fuzz_target!(|data: &[u8]| {
    let mut allocator = Allocator::new(MockOs::default());
    let mut ptr = allocator.alloc(64);
    if ptr.is_null() {
        return;
    }

    let mut graveyard: Vec<usize> = Vec::new();

    for pair in data.chunks(2) {
        if pair.len() < 2 {
            break;
        }
        let size = u16::from_le_bytes([pair[0], pair[1]]) as usize;
        let next = allocator.realloc(ptr, size);
        if next.is_null() {
            return;
        }
        if next != ptr {
            graveyard.push(ptr as usize);
            assert!(!graveyard.contains(&(next as usize)));
        }
        assert_eq!(next as usize % 8, 0);
        ptr = next;
    }

    allocator.release(ptr);
});
