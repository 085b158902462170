//! Allocation errors and the capability trait adapters implement.

use core::fmt;
use core::ptr::NonNull;

/// A typed allocator bound to exactly one arena.
///
/// This is the only surface generic container code needs: it never names a
/// concrete adapter type. Two allocators are interchangeable for deallocation
/// iff [`ArenaAlloc::is_same_arena`] returns `true`.
pub trait ArenaAlloc {
    /// The element type this allocator hands out.
    type Value;

    /// Allocates room for `count` values of [`Self::Value`].
    ///
    /// The returned pointer is never null and is 16-byte aligned. The memory is
    /// uninitialized.
    ///
    /// # Errors
    /// Returns `AllocError` if the request overflows, the element alignment is
    /// not supported, or a new slab could not be obtained.
    fn allocate(&self, count: usize) -> Result<NonNull<Self::Value>, AllocError>;

    /// Returns `count` values worth of memory to the arena.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate(count)` on an allocator bound to
    /// the same arena, and must not have been deallocated since. `count` must be
    /// the value passed to that `allocate` call.
    ///
    /// A pointer from another arena always panics. A double free panics in
    /// debug builds; release builds detect it only when it releases more
    /// bytes than are live in the slab.
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, count: usize);

    /// Returns `true` if both allocators are bound to the same arena.
    fn is_same_arena(&self, other: &Self) -> bool;
}

/// The error type for allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// The system allocator could not provide a new slab.
    OutOfMemory {
        /// Bytes requested from the system allocator.
        requested: usize,
    },
    /// The requested size overflowed while being computed or rounded.
    CapacityOverflow,
    /// The element type needs stronger alignment than slabs guarantee.
    UnsupportedAlignment {
        /// Alignment required by the element type.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "memory allocation of {requested} bytes failed")
            }
            Self::CapacityOverflow => f.write_str("requested capacity overflowed usize"),
            Self::UnsupportedAlignment { align } => {
                write!(f, "alignment of {align} bytes exceeds the 16-byte slab alignment")
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Logs and panics on a broken arena invariant.
///
/// Continuing after one of these would corrupt the bump-pointer accounting.
#[cold]
#[track_caller]
pub(crate) fn invariant_violation(args: fmt::Arguments<'_>) -> ! {
    tracing::error!(reason = %args, "arena invariant violation");
    panic!("invariant violation: {args}");
}
