//! Public API glue: argument validation, dispatch between the arena and
//! mapped paths, and realloc policy (§4.5). This is the only module that
//! ties registry, placement, arena, and large-object paths together into
//! the four operations the design promises.

use crate::arena::ArenaManager;
use crate::error::fatal;
use crate::header::{align_up, header_of, payload_of, Header, Status, ALIGN, HEADER};
use crate::large;
use crate::os::OsPrimitives;
use crate::placement;
use crate::registry::Registry;
use core::ptr;

/// `alloc` requests at or above `MMAP_THRESHOLD_ALLOC - HEADER` bypass the
/// arena and go straight to a standalone mapping.
pub const MMAP_THRESHOLD_ALLOC: usize = 128 * 1024;

/// `zalloc` crosses to the mapped path once the aligned request plus header
/// would reach a full page; zeroed pages are free from the OS, so the
/// threshold is deliberately much smaller than `MMAP_THRESHOLD_ALLOC`.
pub const MMAP_THRESHOLD_ZALLOC: usize = 4096;

/// The block allocator engine, generic over the OS primitive implementation
/// so it can run against a real process break or an in-memory mock.
pub struct Allocator<O: OsPrimitives> {
    os: O,
    registry: Registry,
    arena: ArenaManager,
}

impl<O: OsPrimitives> Allocator<O> {
    /// Builds an allocator with an empty registry over `os`. No syscalls
    /// happen until the first request.
    #[must_use]
    pub const fn new(os: O) -> Self {
        Allocator {
            os,
            registry: Registry::new(),
            arena: ArenaManager::new(),
        }
    }

    /// §4.5 `alloc(size)`.
    pub fn alloc(&mut self, size: usize) -> *mut u8 {
        if size == 0 {
            return ptr::null_mut();
        }
        let header = if size < MMAP_THRESHOLD_ALLOC - HEADER {
            self.arena_alloc(size)
        } else {
            large::map_alloc(&mut self.os, size)
        };
        // SAFETY: `header` was just produced by one of the two paths above.
        unsafe { payload_of(header) }
    }

    /// §4.5 `zalloc(n, size)`. Overflow in `n * size` is the caller's
    /// responsibility, per the design's open question.
    pub fn zalloc(&mut self, n: usize, size: usize) -> *mut u8 {
        let request = n.wrapping_mul(size);
        if request == 0 {
            return ptr::null_mut();
        }
        if align_up(request, ALIGN) + HEADER >= MMAP_THRESHOLD_ZALLOC {
            // Mapped pages arrive zeroed from the OS; no explicit zeroing needed.
            let header = large::map_alloc(&mut self.os, request);
            // SAFETY: `header` was just written by the large-object path.
            return unsafe { payload_of(header) };
        }
        let header = self.arena_alloc(request);
        // SAFETY: `header` is a live block of at least `request` bytes,
        // exclusively owned by this call until it returns the payload pointer.
        unsafe {
            let payload = payload_of(header);
            ptr::write_bytes(payload, 0, (*header).size);
            payload
        }
    }

    /// §4.5 `release(ptr)`.
    pub fn release(&mut self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }
        // SAFETY: caller guarantees `ptr` was returned by `alloc`/`zalloc`/`realloc`.
        let header = unsafe { header_of(ptr) };
        // SAFETY: `header` is the block's own header.
        let status = unsafe { Header::status_of(header) }
            .unwrap_or_else(|| fatal(format_args!("release: unrecognized block status at {ptr:?}")));
        match status {
            Status::Free => {
                eprintln!("mallocrs: double free detected at {ptr:?}");
            }
            Status::Allocated => {
                // SAFETY: `header` is live and linked into the registry;
                // coalescing happens lazily at the next best-fit, not here.
                unsafe { (*header).status = Status::Free as u8 };
            }
            Status::Mapped => {
                // SAFETY: `header` is a live MAPPED block owned solely through `ptr`.
                unsafe { large::map_release(&mut self.os, header) };
            }
        }
    }

    /// §4.5 `realloc(ptr, size)`.
    pub fn realloc(&mut self, ptr: *mut u8, size: usize) -> *mut u8 {
        if size == 0 {
            self.release(ptr);
            return ptr::null_mut();
        }
        if ptr.is_null() {
            return self.alloc(size);
        }

        // SAFETY: caller guarantees `ptr` was returned by this allocator.
        let header = unsafe { header_of(ptr) };
        let status = unsafe { Header::status_of(header) }
            .unwrap_or_else(|| fatal(format_args!("realloc: unrecognized block status at {ptr:?}")));
        if status == Status::Free {
            // Caller violated the contract (use-after-free); surfaced as a
            // failure, not fatal.
            return ptr::null_mut();
        }

        // Coalescing runs first so the in-place growth path below can see a
        // maximal FREE run on the right.
        // SAFETY: every node reachable from `self.registry` is a live arena header.
        unsafe { placement::coalesce(&mut self.registry) };

        let want = align_up(size, ALIGN);
        if status == Status::Mapped {
            return self.realloc_mapped(ptr, header, want, size);
        }
        self.realloc_allocated(ptr, header, want, size)
    }

    fn realloc_mapped(&mut self, ptr: *mut u8, header: *mut Header, want: usize, size: usize) -> *mut u8 {
        // SAFETY: `header` is live.
        let old_size = unsafe { (*header).size };
        if old_size == want {
            return ptr;
        }
        let new_ptr = self.alloc(size);
        // SAFETY: `ptr` is valid for `old_size` bytes, `new_ptr` for at least
        // `size` bytes; the copy length is the smaller of the two.
        unsafe { ptr::copy_nonoverlapping(ptr, new_ptr, old_size.min(size)) };
        self.release(ptr);
        new_ptr
    }

    fn realloc_allocated(&mut self, ptr: *mut u8, header: *mut Header, want: usize, size: usize) -> *mut u8 {
        // SAFETY: `header` is live and linked into the registry.
        let old_size = unsafe { (*header).size };
        if old_size == want {
            return ptr;
        }
        if old_size > want {
            // SAFETY: `header` is a live ALLOCATED block linked into the registry.
            unsafe { placement::split(&mut self.registry, header, want) };
            return ptr;
        }

        // SAFETY: `header` is live.
        let next = unsafe { (*header).next };
        if next.is_null() {
            // Tail block: extend the break in place. A non-positive delta here
            // would be an impossible state (`want > old_size` was just
            // established), so this always satisfies §4.3's requirement.
            let delta = want as isize - old_size as isize;
            self.os.grow_break(delta).unwrap_or_else(|e| fatal(e));
            // SAFETY: `header` is still live; we just grew the break behind it.
            unsafe { (*header).size = want };
            return ptr;
        }

        // SAFETY: `next` is live (registry invariant).
        let next_is_free = unsafe { (*next).status } == Status::Free as u8;
        if next_is_free {
            // SAFETY: `next` is live.
            let next_size = unsafe { (*next).size };
            if old_size + HEADER + next_size >= want {
                // SAFETY: `next` is linked into the registry and physically
                // adjacent to `header` (registry invariant 2); absorbing it
                // and re-splitting to the exact request preserves invariants
                // 1-3.
                unsafe {
                    self.registry.unlink(next);
                    (*header).size = old_size + HEADER + next_size;
                    placement::split(&mut self.registry, header, want);
                }
                return ptr;
            }
        }

        // No in-place path worked: allocate fresh, copy, and free the original
        // without eager coalescing (matches `release`'s laziness).
        let new_ptr = self.alloc(size);
        // SAFETY: `ptr` is valid for `old_size` bytes, `new_ptr` for at least
        // `size` bytes; `old_size < size` here so the full old payload is copied.
        unsafe { ptr::copy_nonoverlapping(ptr, new_ptr, old_size.min(size)) };
        // SAFETY: `header` is still live.
        unsafe { (*header).status = Status::Free as u8 };
        new_ptr
    }

    /// Serves `size` bytes from the arena: best-fit reuse, or first-time
    /// preallocation / tail extension followed by a split.
    fn arena_alloc(&mut self, size: usize) -> *mut Header {
        // SAFETY: every node reachable from `self.registry` is a live arena header.
        unsafe { placement::coalesce(&mut self.registry) };
        // SAFETY: same.
        let hit = unsafe { placement::best_fit(&self.registry, size) };
        if !hit.is_null() {
            // SAFETY: `hit` is a live FREE block linked into the registry.
            return unsafe { placement::split(&mut self.registry, hit, size) };
        }

        if !self.arena.is_preallocated() {
            let fresh = self.arena.preallocate(&mut self.os, &mut self.registry);
            // SAFETY: `fresh` spans the whole preallocated region and was
            // just linked into the registry.
            return unsafe { placement::split(&mut self.registry, fresh, size) };
        }
        self.arena.tail_extend(&mut self.os, &mut self.registry, size)
    }

    /// Exposes the registry for property tests and the conformance harness;
    /// not part of the four public entry points.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
