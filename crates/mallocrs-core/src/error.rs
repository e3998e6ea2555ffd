//! Fatal-failure plumbing.
//!
//! The public entry points never return an error: per the design, OS
//! primitive failures and impossible allocator states abort the process
//! with a diagnostic (§7 of the design). `OsError` exists only as the
//! typed result of the [`crate::os::OsPrimitives`] seam; every caller of
//! that seam converts it to [`fatal`] immediately.

use thiserror::Error;

/// Failure returned by an [`crate::os::OsPrimitives`] method.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OsError {
    #[error("program break growth by {delta} bytes failed")]
    BreakFailed { delta: isize },
    #[error("anonymous mapping of {size} bytes failed")]
    MapFailed { size: usize },
    #[error("unmapping {size} bytes at {addr:#x} failed")]
    UnmapFailed { addr: usize, size: usize },
}

/// Prints a one-line diagnostic to stderr and aborts the process.
///
/// This is the only path by which the allocator reacts to an OS primitive
/// failure or an impossible internal state (non-positive break extension,
/// unrecognized block status). It never returns.
#[cold]
pub fn fatal(reason: impl core::fmt::Display) -> ! {
    eprintln!("mallocrs: fatal: {reason}");
    std::process::abort();
}
