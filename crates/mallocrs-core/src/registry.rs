//! The block registry: an address-ordered doubly-linked list of arena blocks.
//!
//! MAPPED blocks are never linked here (see `large.rs`); only FREE and
//! ALLOCATED arena blocks appear. The registry itself never allocates or
//! frees memory — it only threads pointers supplied by the arena manager
//! and the placement engine.

use crate::header::Header;
use core::ptr;

/// Head of the address-ordered block list. A bare wrapper around the raw
/// head pointer so the ordering invariant has one place to be maintained.
pub struct Registry {
    head: *mut Header,
}

impl Registry {
    pub const fn new() -> Self {
        Registry {
            head: ptr::null_mut(),
        }
    }

    #[must_use]
    pub fn head(&self) -> *mut Header {
        self.head
    }

    /// Inserts `node` at the unique position preserving ascending address
    /// order, fixing up neighbor links. `node.prev`/`node.next` must be
    /// null on entry; this call overwrites them.
    ///
    /// # Safety
    ///
    /// `node` must be a live, unlinked header; every node already in the
    /// registry must be live.
    pub unsafe fn insert_ordered(&mut self, node: *mut Header) {
        // SAFETY: caller guarantees `node` is writable.
        unsafe {
            (*node).prev = ptr::null_mut();
            (*node).next = ptr::null_mut();
        }

        if self.head.is_null() {
            self.head = node;
            return;
        }

        let mut cursor = self.head;
        loop {
            // SAFETY: `cursor` is a live registry node (loop invariant).
            if (cursor as usize) > (node as usize) {
                break;
            }
            let next = unsafe { (*cursor).next };
            if next.is_null() {
                // append at tail
                unsafe {
                    (*cursor).next = node;
                    (*node).prev = cursor;
                }
                return;
            }
            cursor = next;
        }

        // insert `node` immediately before `cursor`
        // SAFETY: `cursor` is live; `prev` may be null if `cursor` is the head.
        unsafe {
            let prev = (*cursor).prev;
            (*node).prev = prev;
            (*node).next = cursor;
            (*cursor).prev = node;
            if prev.is_null() {
                self.head = node;
            } else {
                (*prev).next = node;
            }
        }
    }

    /// Removes `node` from the registry, fixing up neighbor links.
    ///
    /// # Safety
    ///
    /// `node` must currently be linked into this registry.
    pub unsafe fn unlink(&mut self, node: *mut Header) {
        // SAFETY: caller guarantees `node` is linked into this registry.
        unsafe {
            let prev = (*node).prev;
            let next = (*node).next;
            if prev.is_null() {
                self.head = next;
            } else {
                (*prev).next = next;
            }
            if !next.is_null() {
                (*next).prev = prev;
            }
            (*node).prev = ptr::null_mut();
            (*node).next = ptr::null_mut();
        }
    }

    /// Returns the last node in the registry, or null if empty.
    #[must_use]
    pub fn tail(&self) -> *mut Header {
        if self.head.is_null() {
            return ptr::null_mut();
        }
        let mut cursor = self.head;
        loop {
            // SAFETY: every linked node is live.
            let next = unsafe { (*cursor).next };
            if next.is_null() {
                return cursor;
            }
            cursor = next;
        }
    }

    /// An iterator over the registry from head to tail.
    #[must_use]
    pub fn iter(&self) -> RegistryIter {
        RegistryIter { cursor: self.head }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward iterator over registry nodes. Yields raw header pointers; the
/// allocator is responsible for never mutating the list mid-iteration in a
/// way that invalidates `cursor`.
pub struct RegistryIter {
    cursor: *mut Header,
}

impl Iterator for RegistryIter {
    type Item = *mut Header;

    fn next(&mut self) -> Option<*mut Header> {
        if self.cursor.is_null() {
            return None;
        }
        let current = self.cursor;
        // SAFETY: every linked node is live.
        self.cursor = unsafe { (*current).next };
        Some(current)
    }
}
