//! Exercises the `extern "C"` entry points directly (as ordinary Rust
//! functions, since `#[no_mangle]` is suppressed in debug builds — see
//! `mallocrs_abi`'s crate doc comment).

use mallocrs_abi::{calloc, free, malloc, realloc};
use std::ffi::c_void;

#[test]
fn malloc_then_free_round_trips() {
    // SAFETY: `p` is freed exactly once below.
    unsafe {
        let p = malloc(128);
        assert!(!p.is_null());
        assert_eq!(p as usize % 8, 0);
        free(p);
    }
}

#[test]
fn malloc_zero_returns_null() {
    // SAFETY: no pointer is produced to misuse.
    unsafe {
        assert!(malloc(0).is_null());
    }
}

#[test]
fn calloc_zeroes_requested_bytes() {
    // SAFETY: `p` is valid for 64 bytes and freed once.
    unsafe {
        let p = calloc(8, 8);
        assert!(!p.is_null());
        let bytes = std::slice::from_raw_parts(p.cast::<u8>(), 64);
        assert!(bytes.iter().all(|&b| b == 0));
        free(p);
    }
}

#[test]
fn realloc_grows_and_preserves_prefix() {
    // SAFETY: `p`/`q` round-trip through a single live allocation.
    unsafe {
        let p = malloc(32);
        assert!(!p.is_null());
        std::ptr::write_bytes(p.cast::<u8>(), 0x42, 32);
        let q = realloc(p, 4096);
        assert!(!q.is_null());
        let bytes = std::slice::from_raw_parts(q.cast::<u8>(), 32);
        assert!(bytes.iter().all(|&b| b == 0x42));
        free(q);
    }
}

#[test]
fn realloc_null_behaves_like_malloc() {
    // SAFETY: `p` is freed exactly once below.
    unsafe {
        let p = realloc(std::ptr::null_mut::<c_void>(), 16);
        assert!(!p.is_null());
        free(p);
    }
}

#[test]
fn free_null_is_a_noop() {
    // SAFETY: null is always a valid no-op argument to `free`.
    unsafe {
        free(std::ptr::null_mut::<c_void>());
    }
}
