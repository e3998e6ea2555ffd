//! Placement engine: best-fit search, splitting, and coalescing over the
//! arena registry.

use crate::header::{align_up, Header, Status, ALIGN, HEADER};
use crate::registry::Registry;
use core::ptr;

/// Merges every run of adjacent FREE arena blocks into single blocks.
/// Idempotent; must be run before every best-fit search and before the
/// in-place realloc growth paths so they can see maximal FREE runs.
///
/// # Safety
///
/// Every node reachable from `registry` must be a live arena header.
pub unsafe fn coalesce(registry: &mut Registry) {
    let mut cursor = registry.head();
    while !cursor.is_null() {
        // SAFETY: `cursor` is live (registry invariant).
        unsafe {
            while (*cursor).status == Status::Free as u8 {
                let next = (*cursor).next;
                if next.is_null() || (*next).status != Status::Free as u8 {
                    break;
                }
                let merged_size = (*cursor).size + HEADER + (*next).size;
                registry.unlink(next);
                (*cursor).size = merged_size;
            }
            cursor = (*cursor).next;
        }
    }
}

/// Walks the registry once and returns the smallest FREE block whose size
/// is at least `align_up(request)`, or null. Ties go to the lowest address
/// (first encountered, since the registry is address-ordered).
///
/// Callers must run [`coalesce`] first so merged runs are visible.
///
/// # Safety
///
/// Every node reachable from `registry` must be a live arena header.
#[must_use]
pub unsafe fn best_fit(registry: &Registry, request: usize) -> *mut Header {
    let needed = align_up(request, ALIGN);
    let mut best: *mut Header = ptr::null_mut();
    for node in registry.iter() {
        // SAFETY: `node` is live (registry invariant).
        unsafe {
            if (*node).status != Status::Free as u8 || (*node).size < needed {
                continue;
            }
            if best.is_null() || (*node).size < (*best).size {
                best = node;
            }
        }
    }
    best
}

/// Splits FREE block `block` to serve `request` bytes, carving a FREE
/// remainder sibling when one of at least [`ALIGN`] bytes remains.
/// Marks `block` ALLOCATED either way and returns it.
///
/// # Safety
///
/// `block` must be a live FREE arena header linked into `registry`.
pub unsafe fn split(registry: &mut Registry, block: *mut Header, request: usize) -> *mut Header {
    let r = align_up(request, ALIGN);
    // SAFETY: caller guarantees `block` is live and linked.
    let remainder = unsafe { (*block).size as isize - r as isize - HEADER as isize };

    if remainder >= ALIGN as isize {
        let remainder = remainder as usize;
        // SAFETY: `block` payload spans `(*block).size` bytes; the new
        // sibling header is carved from the unused tail of that span.
        unsafe {
            let sibling_addr = block.cast::<u8>().add(HEADER + r);
            let sibling = Header::write_at(
                sibling_addr,
                remainder,
                Status::Free,
                ptr::null_mut(),
                ptr::null_mut(),
            );
            (*block).size = r;
            (*block).status = Status::Allocated as u8;
            registry.insert_ordered(sibling);
        }
    } else {
        // SAFETY: caller guarantees `block` is live.
        unsafe {
            (*block).status = Status::Allocated as u8;
        }
    }
    block
}
