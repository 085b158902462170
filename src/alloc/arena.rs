//! `Arena` — an ordered, growable chain of slabs behind one allocation surface.
//!
//! Allocation tries the current slab first, then the first slab in chain order
//! with enough room, and only then appends a new slab, which becomes current.
//! The chain never shrinks; empty slabs are reused through their own reset.

use core::ptr::NonNull;

use crate::alloc::allocator::{invariant_violation, AllocError};
use crate::alloc::config::ArenaConfig;
use crate::alloc::layout::align_up;
use crate::alloc::slab::Slab;
use crate::alloc::stats::ArenaStats;

/// A region allocator made of a chain of [`Slab`]s.
///
/// An arena has a single writer. It is `Send` but not `Sync`; see
/// [`SyncArena`](crate::alloc::SyncArena) for a locked wrapper.
#[derive(Debug)]
pub struct Arena {
    // Chain order; index 0 is the root.
    slabs: Vec<Slab>,
    // Most recently appended slab.
    current: usize,
    growth_size: usize,
}

impl Arena {
    /// Creates an arena whose first slab holds at least `initial_capacity` bytes.
    ///
    /// Later slabs use the same size.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn new(initial_capacity: usize) -> Result<Self, AllocError> {
        Self::with_config(&ArenaConfig::new(initial_capacity))
    }

    /// Creates an arena from a full configuration.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn with_config(config: &ArenaConfig) -> Result<Self, AllocError> {
        let root = Slab::new(config.initial_capacity)?;
        Ok(Self {
            slabs: vec![root],
            current: 0,
            growth_size: config.growth_increment(),
        })
    }

    /// Allocates `size` bytes, rounded up to 16, with 16-byte alignment.
    ///
    /// # Errors
    /// `CapacityOverflow` if the rounded size overflows, `OutOfMemory` if a
    /// new slab was needed and could not be obtained.
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let aligned = align_up(size).ok_or(AllocError::CapacityOverflow)?;

        let current = &mut self.slabs[self.current];
        if current.remaining_capacity() >= aligned {
            return Ok(current.allocate(size));
        }

        // Found slabs are used in place; only a fresh slab becomes current.
        if let Some(slab) = self
            .slabs
            .iter_mut()
            .find(|slab| slab.remaining_capacity() >= aligned)
        {
            return Ok(slab.allocate(size));
        }

        self.grow(aligned)?;
        Ok(self.slabs[self.current].allocate(size))
    }

    fn grow(&mut self, aligned: usize) -> Result<(), AllocError> {
        self.slabs
            .try_reserve(1)
            .map_err(|_| AllocError::OutOfMemory {
                requested: core::mem::size_of::<Slab>(),
            })?;

        let slab = Slab::new(aligned.max(self.growth_size))?;
        tracing::debug!(
            slabs = self.slabs.len() + 1,
            capacity = slab.capacity(),
            requested = aligned,
            "arena grew"
        );

        self.slabs.push(slab);
        self.current = self.slabs.len() - 1;
        Ok(())
    }

    /// Returns a block to the slab that produced it.
    ///
    /// Zero-byte blocks carry no bookkeeping and are ignored.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate(size)` on this arena and not
    /// released since. A pointer no slab holds, or a double release the slab can
    /// detect, panics.
    pub unsafe fn deallocate(&mut self, ptr: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }

        let current = &mut self.slabs[self.current];
        if current.holds(ptr.as_ptr()) {
            // SAFETY: forwarded from the caller.
            unsafe { current.deallocate(ptr, size) };
            return;
        }

        match self.slabs.iter_mut().find(|slab| slab.holds(ptr.as_ptr())) {
            // SAFETY: forwarded from the caller.
            Some(slab) => unsafe { slab.deallocate(ptr, size) },
            None => invariant_violation(format_args!(
                "pointer {ptr:p} was not allocated by this arena"
            )),
        }
    }

    /// Returns `true` if some slab of this arena contains `ptr`.
    pub fn owns(&self, ptr: *const u8) -> bool {
        self.slabs.iter().any(|slab| slab.contains(ptr))
    }

    /// The slabs in chain order, root first.
    pub fn slabs(&self) -> impl ExactSizeIterator<Item = &Slab> + '_ {
        self.slabs.iter()
    }

    /// The slab that serves the fast path.
    pub fn current(&self) -> &Slab {
        &self.slabs[self.current]
    }

    /// Number of slabs in the chain. Never decreases.
    pub fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    /// Requested capacity of appended slabs.
    pub fn growth_size(&self) -> usize {
        self.growth_size
    }

    /// Occupancy summed over the chain.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats::collect(&self.slabs)
    }
}
