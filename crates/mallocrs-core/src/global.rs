//! The process-wide allocator singleton backing the four free functions.
//!
//! §5/§9: "model as an explicit allocator context... a single module-level
//! instance by default." The registry head and preallocation flag are
//! process-wide mutable state; this module is the one place that state
//! lives for real syscall-backed use. Tests and the harness instead build
//! their own [`crate::Allocator`] directly over [`crate::os::MockOs`], never
//! touching this singleton.

use crate::allocator::Allocator;
use crate::os::LinuxOs;
use core::cell::UnsafeCell;

struct GlobalCell(UnsafeCell<Allocator<LinuxOs>>);

// SAFETY: the allocator is single-threaded and non-reentrant by design (§5).
// `Sync` here only satisfies `static` storage; it does not mean the engine
// tolerates concurrent access. The caller (`mallocrs-abi`, or any other
// host) must serialize every public call itself, exactly as the design
// mandates rather than silently adding a lock that would promise more.
unsafe impl Sync for GlobalCell {}

static GLOBAL: GlobalCell = GlobalCell(UnsafeCell::new(Allocator::new(LinuxOs::new())));

#[inline]
fn with_global<R>(f: impl FnOnce(&mut Allocator<LinuxOs>) -> R) -> R {
    // SAFETY: per the type's doc comment, every caller into this module is
    // required to serialize access; under that contract this is the sole
    // live reference to the singleton for the duration of `f`.
    let allocator = unsafe { &mut *GLOBAL.0.get() };
    f(allocator)
}

/// `alloc(size)` against the process-wide arena. See [`Allocator::alloc`].
#[must_use]
pub fn alloc(size: usize) -> *mut u8 {
    with_global(|a| a.alloc(size))
}

/// `zalloc(n, size)` against the process-wide arena. See [`Allocator::zalloc`].
#[must_use]
pub fn zalloc(n: usize, size: usize) -> *mut u8 {
    with_global(|a| a.zalloc(n, size))
}

/// `realloc(ptr, size)` against the process-wide arena. See [`Allocator::realloc`].
#[must_use]
pub fn realloc(ptr: *mut u8, size: usize) -> *mut u8 {
    with_global(|a| a.realloc(ptr, size))
}

/// `release(ptr)` against the process-wide arena. See [`Allocator::release`].
pub fn release(ptr: *mut u8) {
    with_global(|a| a.release(ptr));
}
