//! Slabs, arenas and the typed adapters that allocate from them.

pub mod adapter;
pub mod allocator;
pub mod arena;
pub mod arena_box;
pub mod config;
pub mod layout;
pub mod scope;
pub mod slab;
pub mod stats;
pub mod sync;

pub use adapter::{ArenaAllocator, InstanceOwned, OwnershipPolicy, ScopeShared, ScopedAllocator};
pub use allocator::{AllocError, ArenaAlloc};
pub use arena::Arena;
pub use arena_box::ArenaBox;
pub use config::{ArenaConfig, ConfigError};
pub use scope::ArenaScope;
pub use slab::Slab;
pub use stats::ArenaStats;
pub use sync::SyncArena;
