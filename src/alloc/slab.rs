//! `Slab` — one contiguous buffer served by a bump cursor.
//!
//! A slab never keeps a free list. Space comes back only in two ways:
//! - **full reset**: the last live byte is released and the cursor returns to the start;
//! - **tail reclamation**: the most recently allocated block is released and the
//!   cursor rewinds to its start.
//!
//! Any other release leaves the block as slack until the next full reset.

use core::alloc::Layout;
use core::ops::Range;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};
#[cfg(debug_assertions)]
use std::collections::BTreeSet;

use crate::alloc::allocator::{invariant_violation, AllocError};
use crate::alloc::layout::{align_up, slab_capacity, SLAB_ALIGN};

/// A fixed-capacity block of memory obtained from the system allocator.
///
/// The buffer is owned exclusively by the slab and is only reachable through
/// the [`Arena`](crate::alloc::Arena) that owns the slab.
pub struct Slab {
    content: NonNull<u8>,
    capacity: usize,
    // Offset of the next free byte.
    cursor: usize,
    live_bytes: usize,
    // Offsets of outstanding non-empty blocks, to catch double frees that the
    // live byte count alone cannot see.
    #[cfg(debug_assertions)]
    live_blocks: BTreeSet<usize>,
}

impl Slab {
    /// Creates a slab of at least `requested` bytes, rounded up to a power of two.
    ///
    /// # Errors
    /// `CapacityOverflow` if the rounded size does not fit a `Layout`,
    /// `OutOfMemory` if the system allocator refuses the buffer.
    pub(crate) fn new(requested: usize) -> Result<Self, AllocError> {
        let capacity = slab_capacity(requested).ok_or(AllocError::CapacityOverflow)?;
        let layout = Layout::from_size_align(capacity, SLAB_ALIGN)
            .map_err(|_| AllocError::CapacityOverflow)?;

        // SAFETY: `layout` has a non-zero size (capacity >= 1).
        let ptr = unsafe { alloc(layout) };
        let content = NonNull::new(ptr).ok_or(AllocError::OutOfMemory { requested: capacity })?;

        tracing::debug!(requested, capacity, "slab created");

        Ok(Self {
            content,
            capacity,
            cursor: 0,
            live_bytes: 0,
            #[cfg(debug_assertions)]
            live_blocks: BTreeSet::new(),
        })
    }

    /// Total size of the buffer in bytes. Always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes between the start of the buffer and the cursor.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Sum of the aligned sizes of all outstanding blocks.
    ///
    /// Released interior blocks are no longer counted here but stay below the
    /// cursor, so `used() - live_bytes()` is the slack awaiting a full reset.
    #[inline]
    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Bytes still available to the bump cursor.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Returns `true` if `ptr` lies between the start of the buffer and the
    /// cursor, both ends inclusive.
    ///
    /// The inclusive upper bound admits zero-length blocks handed out at the
    /// cursor itself.
    #[inline]
    pub fn contains(&self, ptr: *const u8) -> bool {
        let start = self.base();
        let addr = ptr as usize;
        start <= addr && addr <= start + self.cursor
    }

    /// Like [`Slab::contains`] but excludes the cursor: only addresses that can
    /// start a non-empty live block. Used to route releases, where an adjacent
    /// buffer may begin exactly at a full slab's end.
    #[inline]
    pub(crate) fn holds(&self, ptr: *const u8) -> bool {
        let start = self.base();
        let addr = ptr as usize;
        start <= addr && addr < start + self.cursor
    }

    /// Address range covered by the whole buffer.
    pub fn address_range(&self) -> Range<usize> {
        let start = self.base();
        start..start + self.capacity
    }

    #[inline]
    fn base(&self) -> usize {
        self.content.as_ptr() as usize
    }

    /// Bumps the cursor by `size` rounded up to 16 bytes and returns the old cursor.
    ///
    /// The caller must have checked `remaining_capacity() >= align_up(size)`;
    /// a request that does not fit is an invariant violation.
    #[inline]
    pub(crate) fn allocate(&mut self, size: usize) -> NonNull<u8> {
        let remaining = self.remaining_capacity();
        let aligned = match align_up(size) {
            Some(aligned) if aligned <= remaining => aligned,
            _ => invariant_violation(format_args!(
                "slab asked for {size} bytes with {remaining} remaining"
            )),
        };

        let offset = self.cursor;
        self.cursor += aligned;
        self.live_bytes += aligned;
        #[cfg(debug_assertions)]
        if aligned > 0 {
            self.live_blocks.insert(offset);
        }

        // SAFETY: offset <= capacity, so the result stays within (or one past)
        // the buffer, which is non-null.
        unsafe { NonNull::new_unchecked(self.content.as_ptr().add(offset)) }
    }

    /// Releases a block previously returned by [`Slab::allocate`].
    ///
    /// # Safety
    /// `ptr` and `size` must describe a live block of this slab. A pointer
    /// outside the slab, a block that extends past the cursor, or a release
    /// that would take the live count below zero panics. Debug builds also
    /// panic on a block that is not live, which catches every double free;
    /// release builds catch a double free only when it drives the live count
    /// below zero. A wrong size for a live block cannot be detected and lets
    /// later blocks overlap it.
    pub(crate) unsafe fn deallocate(&mut self, ptr: NonNull<u8>, size: usize) {
        if !self.contains(ptr.as_ptr()) {
            invariant_violation(format_args!("pointer {ptr:p} does not belong to this slab"));
        }
        let Some(aligned) = align_up(size) else {
            invariant_violation(format_args!("release of {size} bytes overflows"));
        };

        let offset = ptr.as_ptr() as usize - self.base();
        if offset.checked_add(aligned).map_or(true, |end| end > self.cursor) {
            invariant_violation(format_args!(
                "block of {aligned} bytes at offset {offset} extends past cursor {}",
                self.cursor
            ));
        }
        #[cfg(debug_assertions)]
        if aligned > 0 && !self.live_blocks.remove(&offset) {
            invariant_violation(format_args!(
                "no live block starts at offset {offset} (double free?)"
            ));
        }
        if aligned > self.live_bytes {
            invariant_violation(format_args!(
                "release of {aligned} bytes with only {} live (double free?)",
                self.live_bytes
            ));
        }

        self.live_bytes -= aligned;
        if self.live_bytes == 0 {
            tracing::trace!(capacity = self.capacity, "slab reset");
            self.cursor = 0;
        } else if offset + aligned == self.cursor {
            tracing::trace!(from = self.cursor, to = offset, "slab tail rewound");
            self.cursor = offset;
        }
    }
}

impl Drop for Slab {
    fn drop(&mut self) {
        // SAFETY: the buffer was allocated in `Slab::new` with exactly this layout
        // and is released only here.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.capacity, SLAB_ALIGN);
            dealloc(self.content.as_ptr(), layout);
        }
    }
}

// SAFETY: the slab owns its buffer outright; moving it to another thread moves
// that ownership. It is not `Sync`: all mutation goes through `&mut self`.
unsafe impl Send for Slab {}

impl core::fmt::Debug for Slab {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slab")
            .field("capacity", &self.capacity)
            .field("used", &self.cursor)
            .field("live_bytes", &self.live_bytes)
            .finish()
    }
}
