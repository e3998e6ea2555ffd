//! `mallocrs-core`: the block allocator engine backing the mallocrs heap.
//!
//! Registry, placement, arena, and large-object paths compose into
//! [`Allocator<O>`](Allocator), generic over an [`os::OsPrimitives`]
//! implementation so the engine runs identically against a real process
//! break (`os::LinuxOs`) or an in-memory mock (`os::MockOs`). [`global`]
//! hosts the one process-wide instance the ABI crate links against.
//!
//! Only [`header`] performs pointer arithmetic on header memory; nothing
//! outside this crate ever sees a `*mut header::Header`.

pub mod allocator;
pub mod arena;
pub mod error;
pub mod global;
pub mod header;
pub mod large;
pub mod os;
pub mod placement;
pub mod registry;
pub mod syscall;

pub use allocator::{Allocator, MMAP_THRESHOLD_ALLOC, MMAP_THRESHOLD_ZALLOC};
pub use arena::PREALLOC;
pub use error::OsError;
pub use header::{align_up, ALIGN, HEADER};
pub use os::{LinuxOs, MockOs, OsPrimitives};
pub use registry::Registry;
