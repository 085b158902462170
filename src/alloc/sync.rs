//! `SyncArena` — an arena usable from several threads behind a mutex.
//!
//! The base arena has a single writer. When several threads must share one
//! chain, every `allocate` and `deallocate` takes the lock.

use core::ptr::NonNull;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::alloc::allocator::AllocError;
use crate::alloc::arena::Arena;
use crate::alloc::config::ArenaConfig;
use crate::alloc::stats::ArenaStats;

/// A mutex-guarded [`Arena`].
#[derive(Debug)]
pub struct SyncArena {
    inner: Mutex<Arena>,
}

impl SyncArena {
    /// Creates a locked arena of `initial_capacity` bytes.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn new(initial_capacity: usize) -> Result<Self, AllocError> {
        Arena::new(initial_capacity).map(Self::from_arena)
    }

    /// Creates a locked arena from `config`.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn with_config(config: &ArenaConfig) -> Result<Self, AllocError> {
        Arena::with_config(config).map(Self::from_arena)
    }

    /// Wraps an existing arena.
    pub fn from_arena(arena: Arena) -> Self {
        Self {
            inner: Mutex::new(arena),
        }
    }

    // A panic while holding the lock is an invariant violation that already
    // surfaced; later callers still see the arena.
    fn lock(&self) -> MutexGuard<'_, Arena> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`Arena::allocate`].
    ///
    /// # Errors
    /// Same as [`Arena::allocate`].
    pub fn allocate(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        self.lock().allocate(size)
    }

    /// See [`Arena::deallocate`].
    ///
    /// # Safety
    /// Same as [`Arena::deallocate`].
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize) {
        // SAFETY: forwarded from the caller.
        unsafe { self.lock().deallocate(ptr, size) }
    }

    /// Occupancy of the guarded arena.
    pub fn stats(&self) -> ArenaStats {
        self.lock().stats()
    }

    /// Unwraps the arena.
    pub fn into_inner(self) -> Arena {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
