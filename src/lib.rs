//! # `slabarena` - Slab-Chained Region Allocators
//!
//! Region (arena) allocators built from fixed-capacity slabs. Each slab is a
//! power-of-two buffer from the system allocator, served by a bump cursor. When
//! a slab runs out, the arena appends another one; space is reclaimed only at
//! the tail of a slab or when a slab becomes completely empty.
//!
//! ## Design
//!
//! ```text
//!   Arena
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │  root                                            current     │
//!   │   ▼                                                 ▼        │
//!   │ ┌──────────────┐   ┌──────────────────────┐   ┌───────────┐  │
//!   │ │ A1 │ A2 │    │ → │ B1 │░░│ B3 │          │ → │ C1 │      │  │
//!   │ └──────────────┘   └──────────────────────┘   └───────────┘  │
//!   │        ▲                 ▲       ▲                 ▲         │
//!   │     cursor             slack   cursor            cursor      │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Bump allocation**: O(1); sizes are rounded up to 16 bytes and every block
//!   is 16-byte aligned.
//! - **Tail reclamation**: freeing the most recent block of a slab rewinds its
//!   cursor.
//! - **Full reset**: when a slab's live byte count reaches zero, its cursor goes
//!   back to the start and all slack is reclaimed at once.
//! - **No coalescing**: any other free leaves slack until the next full reset.
//!
//! ### Layers
//!
//! 1. [`Slab`]: one owned buffer with a cursor and a live-byte count.
//! 2. [`Arena`]: the slab chain: current slab first, then a scan in chain
//!    order, then growth.
//! 3. [`ArenaAllocator`]: typed adapters implementing [`ArenaAlloc`], with two
//!    ownership policies:
//!    - [`InstanceOwned`]: a private arena shared by clones and rebinds;
//!    - [`ScopeShared`]: one arena per element type inside an [`ArenaScope`].
//!
//! Generic code such as [`ArenaBox`] depends only on [`ArenaAlloc`].
//!
//! ## Threads
//!
//! An arena has a single writer. Adapters and scopes are `!Send`, so an arena
//! stays on the thread of control that created it. [`SyncArena`] adds a mutex
//! for the rare case where one chain must be shared.
//!
//! ## Errors
//!
//! Allocation failures are returned as [`AllocError`]. Releasing a pointer the
//! arena never produced, or releasing a block twice where it can be detected,
//! is a programmer error and panics.
//!
//! ## Example
//!
//! ```rust
//! use slabarena::{ArenaAlloc, ArenaAllocator, ArenaConfig};
//!
//! let alloc = ArenaAllocator::<u32>::with_config(&ArenaConfig::new(64)).unwrap();
//!
//! let blocks: Vec<_> = (0..6).map(|_| alloc.allocate(4).unwrap()).collect();
//! assert_eq!(alloc.stats().slabs, 2);
//!
//! for ptr in blocks.into_iter().rev() {
//!     unsafe { alloc.deallocate(ptr, 4) };
//! }
//! assert_eq!(alloc.stats().live_bytes, 0);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;

pub use alloc::{
    AllocError,
    Arena,
    ArenaAlloc,
    ArenaAllocator,
    ArenaBox,
    ArenaConfig,
    ArenaScope,
    ArenaStats,
    ConfigError,
    InstanceOwned,
    OwnershipPolicy,
    ScopeShared,
    ScopedAllocator,
    Slab,
    SyncArena,
};

// Compile-time checks on the layout arithmetic the slabs rely on.
const _: () = {
    use crate::alloc::layout::{align_up, slab_capacity, DEFAULT_INITIAL_CAPACITY, SLAB_ALIGN};

    assert!(SLAB_ALIGN.is_power_of_two());
    assert!(SLAB_ALIGN >= core::mem::align_of::<u128>());
    assert!(matches!(align_up(1), Some(SLAB_ALIGN)));
    assert!(matches!(slab_capacity(DEFAULT_INITIAL_CAPACITY), Some(1024)));
};
