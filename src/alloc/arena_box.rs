//! `ArenaBox` — a single value owned in arena memory.
//!
//! Written only against [`ArenaAlloc`], so it works with any adapter policy.

use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

use crate::alloc::allocator::{AllocError, ArenaAlloc};

/// A uniquely owned value stored in memory obtained from `A`.
///
/// Dropping the box runs `T`'s destructor and returns the memory through the
/// same allocator. Boxes dropped in reverse creation order let the arena rewind
/// its cursor all the way back.
pub struct ArenaBox<T, A: ArenaAlloc<Value = T>> {
    ptr: NonNull<T>,
    alloc: A,
}

impl<T, A: ArenaAlloc<Value = T>> ArenaBox<T, A> {
    /// Moves `value` into memory allocated from `alloc`.
    ///
    /// # Errors
    /// Returns `AllocError` if `alloc` cannot provide the memory; `value` is dropped.
    pub fn new_in(value: T, alloc: A) -> Result<Self, AllocError> {
        let ptr = alloc.allocate(1)?;
        // SAFETY: `ptr` is non-null, aligned for `T` and sized for one `T`.
        unsafe { ptr.as_ptr().write(value) };
        Ok(Self { ptr, alloc })
    }

    /// The allocator that owns this box's memory.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Moves the value out and releases the memory.
    pub fn into_inner(self) -> T {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the value and the allocator are
        // each read out exactly once.
        unsafe {
            let value = ptr::read(this.ptr.as_ptr());
            let alloc = ptr::read(&this.alloc);
            alloc.deallocate(this.ptr, 1);
            value
        }
    }
}

impl<T, A: ArenaAlloc<Value = T>> Deref for ArenaBox<T, A> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the box owns an initialized `T` at `ptr`.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, A: ArenaAlloc<Value = T>> DerefMut for ArenaBox<T, A> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as above, and `&mut self` gives exclusive access.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T, A: ArenaAlloc<Value = T>> Drop for ArenaBox<T, A> {
    fn drop(&mut self) {
        // SAFETY: the value is initialized and dropped only here; the memory came
        // from `self.alloc.allocate(1)`.
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            self.alloc.deallocate(self.ptr, 1);
        }
    }
}

impl<T: fmt::Debug, A: ArenaAlloc<Value = T>> fmt::Debug for ArenaBox<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
