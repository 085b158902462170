//! Typed allocator adapters bound to one [`Arena`].
//!
//! `ArenaAllocator<T, P>` turns element counts into byte requests and checks that
//! `T` fits the 16-byte slab alignment. The policy `P` decides where the arena
//! comes from:
//! - [`InstanceOwned`]: the adapter creates a private arena; clones and
//!   [`rebind`](ArenaAllocator::rebind)s share it.
//! - [`ScopeShared`]: the arena is handed out by an
//!   [`ArenaScope`](crate::alloc::ArenaScope), one per element type.
//!
//! In both cases the arena is dropped when the last adapter bound to it drops.

use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;
use std::rc::Rc;

use crate::alloc::allocator::{invariant_violation, AllocError, ArenaAlloc};
use crate::alloc::arena::Arena;
use crate::alloc::config::ArenaConfig;
use crate::alloc::layout::SLAB_ALIGN;
use crate::alloc::stats::ArenaStats;

pub(crate) type SharedArena = Rc<RefCell<Arena>>;

mod sealed {
    pub trait Sealed {}
}

/// Where an adapter's arena comes from.
pub trait OwnershipPolicy: sealed::Sealed + 'static {}

/// The adapter owns a private arena with an explicit lifetime.
#[derive(Debug)]
pub enum InstanceOwned {}

/// The arena is shared by every adapter of one element type within an
/// [`ArenaScope`](crate::alloc::ArenaScope).
#[derive(Debug)]
pub enum ScopeShared {}

impl sealed::Sealed for InstanceOwned {}
impl sealed::Sealed for ScopeShared {}
impl OwnershipPolicy for InstanceOwned {}
impl OwnershipPolicy for ScopeShared {}

/// An adapter of the scope-shared policy.
pub type ScopedAllocator<T> = ArenaAllocator<T, ScopeShared>;

/// A typed allocator bound to exactly one arena.
///
/// Adapters are `!Send` and `!Sync`: an arena belongs to one thread of control.
///
/// ```rust
/// use slabarena::{ArenaAlloc, ArenaAllocator};
///
/// let alloc = ArenaAllocator::<u64>::new(1024).unwrap();
/// let ptr = alloc.allocate(4).unwrap();
/// unsafe {
///     ptr.as_ptr().write(7);
///     assert_eq!(ptr.as_ptr().read(), 7);
///     alloc.deallocate(ptr, 4);
/// }
/// assert_eq!(alloc.stats().live_bytes, 0);
/// ```
pub struct ArenaAllocator<T, P: OwnershipPolicy = InstanceOwned> {
    arena: SharedArena,
    _marker: PhantomData<(fn() -> T, P)>,
}

impl<T> ArenaAllocator<T, InstanceOwned> {
    /// Creates an adapter over a new private arena of `initial_capacity` bytes.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn new(initial_capacity: usize) -> Result<Self, AllocError> {
        Arena::new(initial_capacity).map(Self::from_arena)
    }

    /// Creates an adapter over a new private arena built from `config`.
    ///
    /// # Errors
    /// Returns `AllocError` if the first slab cannot be allocated.
    pub fn with_config(config: &ArenaConfig) -> Result<Self, AllocError> {
        Arena::with_config(config).map(Self::from_arena)
    }

    /// Takes ownership of an existing arena.
    pub fn from_arena(arena: Arena) -> Self {
        Self::bind(Rc::new(RefCell::new(arena)))
    }

    /// An adapter for another element type, bound to the same arena.
    pub fn rebind<U>(&self) -> ArenaAllocator<U, InstanceOwned> {
        ArenaAllocator::bind(Rc::clone(&self.arena))
    }
}

impl<T, P: OwnershipPolicy> ArenaAllocator<T, P> {
    pub(crate) fn bind(arena: SharedArena) -> Self {
        Self {
            arena,
            _marker: PhantomData,
        }
    }

    fn byte_size(count: usize) -> Result<usize, AllocError> {
        let align = align_of::<T>();
        if align > SLAB_ALIGN {
            return Err(AllocError::UnsupportedAlignment { align });
        }
        count
            .checked_mul(size_of::<T>())
            .ok_or(AllocError::CapacityOverflow)
    }

    /// Occupancy of the bound arena.
    pub fn stats(&self) -> ArenaStats {
        self.arena.borrow().stats()
    }

    /// Runs `f` with read access to the bound arena.
    pub fn inspect<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        f(&self.arena.borrow())
    }

    /// An identifier of the bound arena, equal for all adapters bound to it.
    pub fn arena_id(&self) -> usize {
        Rc::as_ptr(&self.arena) as usize
    }

    /// Number of adapters currently bound to the arena.
    pub fn bound_count(&self) -> usize {
        Rc::strong_count(&self.arena)
    }
}

impl<T, P: OwnershipPolicy> ArenaAlloc for ArenaAllocator<T, P> {
    type Value = T;

    fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let bytes = Self::byte_size(count)?;
        let ptr = self.arena.borrow_mut().allocate(bytes)?;
        Ok(ptr.cast())
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        let bytes = match Self::byte_size(count) {
            Ok(bytes) => bytes,
            Err(err) => invariant_violation(format_args!("release of {count} elements: {err}")),
        };
        // SAFETY: forwarded from the caller.
        unsafe { self.arena.borrow_mut().deallocate(ptr.cast(), bytes) };
    }

    fn is_same_arena(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl<T, P: OwnershipPolicy> Clone for ArenaAllocator<T, P> {
    fn clone(&self) -> Self {
        Self::bind(Rc::clone(&self.arena))
    }
}

impl<T, U, P: OwnershipPolicy> PartialEq<ArenaAllocator<U, P>> for ArenaAllocator<T, P> {
    fn eq(&self, other: &ArenaAllocator<U, P>) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }
}

impl<T, P: OwnershipPolicy> Eq for ArenaAllocator<T, P> {}

impl<T, P: OwnershipPolicy> fmt::Debug for ArenaAllocator<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("element", &core::any::type_name::<T>())
            .field("arena", &format_args!("{:#x}", self.arena_id()))
            .field("stats", &self.stats())
            .finish()
    }
}
