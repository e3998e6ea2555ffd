//! Arena manager: one-shot preallocation and tail extension of the
//! brk-backed arena.
//!
//! Every OS primitive failure here is fatal (§7): callers get a live block
//! back or the process aborts, never a `Result`.

use crate::error::fatal;
use crate::header::{align_up, Header, Status, ALIGN, HEADER};
use crate::os::OsPrimitives;
use crate::registry::Registry;
use core::ptr;

/// Size of the one-shot initial arena reservation.
pub const PREALLOC: usize = 128 * 1024;

/// Tracks whether the first-time preallocation has already happened.
pub struct ArenaManager {
    preallocated: bool,
}

impl ArenaManager {
    #[must_use]
    pub const fn new() -> Self {
        ArenaManager { preallocated: false }
    }

    #[must_use]
    pub fn is_preallocated(&self) -> bool {
        self.preallocated
    }

    /// Performs the one-time `PREALLOC`-byte program-break growth, wraps it
    /// in a single FREE arena block, and links it into `registry`. Must be
    /// called at most once per `ArenaManager`.
    pub fn preallocate<O: OsPrimitives>(&mut self, os: &mut O, registry: &mut Registry) -> *mut Header {
        debug_assert!(!self.preallocated, "preallocate called twice");
        let total = align_up(PREALLOC, ALIGN);
        let base = os
            .grow_break(total as isize)
            .unwrap_or_else(|e| fatal(e));
        let size = total - HEADER;
        // SAFETY: `base` is exactly `total` fresh bytes from the OS.
        let block = unsafe { Header::write_at(base, size, Status::Free, ptr::null_mut(), ptr::null_mut()) };
        // SAFETY: `block` is a freshly written, unlinked header.
        unsafe { registry.insert_ordered(block) };
        self.preallocated = true;
        block
    }

    /// Serves `request` bytes by extending the arena tail: growing the
    /// existing FREE tail block in place, or appending a brand-new
    /// ALLOCATED block, per §4.3. Only valid once the arena is already
    /// preallocated and best-fit has failed.
    pub fn tail_extend<O: OsPrimitives>(
        &mut self,
        os: &mut O,
        registry: &mut Registry,
        request: usize,
    ) -> *mut Header {
        debug_assert!(self.preallocated, "tail_extend before preallocation");
        let r = align_up(request, ALIGN);
        let tail = registry.tail();

        // SAFETY: `tail`, if non-null, is a live arena node (registry invariant).
        let tail_is_free = !tail.is_null() && unsafe { (*tail).status } == Status::Free as u8;

        if tail_is_free {
            // SAFETY: `tail` is live and FREE.
            let tail_size = unsafe { (*tail).size };
            let delta = r as isize - tail_size as isize;
            if delta <= 0 {
                fatal(format_args!(
                    "tail extension requires a positive break delta (requested {r}, tail already {tail_size})"
                ));
            }
            os.grow_break(delta).unwrap_or_else(|e| fatal(e));
            // SAFETY: `tail` is still live; we just grew the break behind it.
            unsafe {
                (*tail).status = Status::Allocated as u8;
                (*tail).size = r;
            }
            tail
        } else {
            let total = HEADER + r;
            let base = os
                .grow_break(total as isize)
                .unwrap_or_else(|e| fatal(e));
            // SAFETY: `base` is exactly `total` fresh bytes from the OS.
            let block = unsafe { Header::write_at(base, r, Status::Allocated, ptr::null_mut(), ptr::null_mut()) };
            // SAFETY: `block` is a freshly written, unlinked header.
            unsafe { registry.insert_ordered(block) };
            block
        }
    }
}

impl Default for ArenaManager {
    fn default() -> Self {
        Self::new()
    }
}
