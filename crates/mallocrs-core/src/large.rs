//! Large-object path: direct OS mapping and unmapping for requests that
//! cross the arena thresholds in [`crate::allocator`].
//!
//! Mapped blocks are never linked into [`crate::registry::Registry`]
//! (invariant 4); they are reached only through the user pointer and
//! destroyed by a single unmap call on release.

use crate::error::fatal;
use crate::header::{align_up, Header, Status, ALIGN, HEADER};
use crate::os::OsPrimitives;
use core::ptr;

/// Obtains a fresh anonymous mapping sized to `HEADER + align_up(size)` and
/// wraps it in a MAPPED header. The returned header is unlinked and must be
/// reached only through the payload pointer handed back to the caller.
pub fn map_alloc<O: OsPrimitives>(os: &mut O, size: usize) -> *mut Header {
    let payload = align_up(size, ALIGN);
    let total = HEADER + payload;
    let base = os.map_anon(total).unwrap_or_else(|e| fatal(e));
    // SAFETY: `base` is exactly `total` fresh bytes from a successful mapping.
    unsafe { Header::write_at(base, payload, Status::Mapped, ptr::null_mut(), ptr::null_mut()) }
}

/// Releases a MAPPED block obtained from [`map_alloc`], unmapping exactly
/// `HEADER + header.size` bytes.
///
/// # Safety
///
/// `header` must point at a live MAPPED header with no other surviving
/// alias to the mapping.
pub unsafe fn map_release<O: OsPrimitives>(os: &mut O, header: *mut Header) {
    // SAFETY: caller guarantees `header` is a live MAPPED header.
    let size = unsafe { (*header).size };
    let total = HEADER + size;
    os.unmap(header.cast::<u8>(), total).unwrap_or_else(|e| fatal(e));
}
