//! `ArenaScope` — the per-thread-of-control context of the scope-shared policy.
//!
//! A scope hands out [`ScopedAllocator`]s. Every adapter for the same element
//! type gets the same arena; the arena is created on first demand and dropped
//! as soon as the last adapter bound to it is dropped. The scope itself only
//! keeps weak references, so a later request for that type starts a fresh arena.
//!
//! A scope is neither `Send` nor `Sync`, which keeps each arena on the thread
//! of control that owns the scope:
//!
//! ```rust,compile_fail
//! use slabarena::ArenaScope;
//!
//! let scope = ArenaScope::new();
//! std::thread::spawn(move || drop(scope));
//! ```

use core::any::{type_name, TypeId};
use core::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::alloc::adapter::ScopedAllocator;
use crate::alloc::allocator::AllocError;
use crate::alloc::arena::Arena;
use crate::alloc::config::ArenaConfig;
use crate::alloc::stats::ArenaStats;

/// Hands out one shared arena per element type.
///
/// ```rust
/// use slabarena::{ArenaAlloc, ArenaScope};
///
/// let scope = ArenaScope::new();
/// let a = scope.allocator::<u32>().unwrap();
/// let b = scope.allocator::<u32>().unwrap();
/// assert!(a.is_same_arena(&b));
///
/// let p = a.allocate(1).unwrap();
/// unsafe { b.deallocate(p, 1) };
/// ```
#[derive(Debug)]
pub struct ArenaScope {
    config: ArenaConfig,
    arenas: RefCell<HashMap<TypeId, Weak<RefCell<Arena>>>>,
}

impl ArenaScope {
    /// Creates a scope whose arenas use the default configuration.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// Creates a scope whose arenas are built from `config`.
    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            config,
            arenas: RefCell::new(HashMap::new()),
        }
    }

    /// Configuration used for every arena this scope creates.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Returns an adapter bound to the arena for `T`, creating it if no live
    /// adapter for `T` exists.
    ///
    /// # Errors
    /// Returns `AllocError` if a new arena was needed and its first slab could
    /// not be allocated.
    pub fn allocator<T: 'static>(&self) -> Result<ScopedAllocator<T>, AllocError> {
        let key = TypeId::of::<T>();
        let mut arenas = self.arenas.borrow_mut();

        if let Some(arena) = arenas.get(&key).and_then(Weak::upgrade) {
            return Ok(ScopedAllocator::bind(arena));
        }

        arenas.retain(|_, arena| arena.strong_count() > 0);
        let arena = Rc::new(RefCell::new(Arena::with_config(&self.config)?));
        arenas.insert(key, Rc::downgrade(&arena));
        tracing::debug!(
            element = type_name::<T>(),
            live = arenas.len(),
            "scope created arena"
        );

        Ok(ScopedAllocator::bind(arena))
    }

    /// Number of arenas that still have at least one adapter bound to them.
    pub fn live_arenas(&self) -> usize {
        self.arenas
            .borrow()
            .values()
            .filter(|arena| arena.strong_count() > 0)
            .count()
    }

    /// Occupancy of the arena for `T`, if one is alive.
    pub fn stats_for<T: 'static>(&self) -> Option<ArenaStats> {
        let arena = self
            .arenas
            .borrow()
            .get(&TypeId::of::<T>())
            .and_then(Weak::upgrade)?;
        let stats = arena.borrow().stats();
        Some(stats)
    }
}

impl Default for ArenaScope {
    fn default() -> Self {
        Self::new()
    }
}
