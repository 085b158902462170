//! Occupancy reporting.

use core::fmt;

use serde::Serialize;

use crate::alloc::slab::Slab;

/// A snapshot of an arena's occupancy, summed over its whole slab chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArenaStats {
    /// Number of slabs in the chain.
    pub slabs: usize,
    /// Sum of slab capacities.
    pub capacity: usize,
    /// Aligned bytes of all outstanding blocks.
    pub live_bytes: usize,
    /// Bytes still available to the bump cursors.
    pub remaining: usize,
}

impl ArenaStats {
    pub(crate) fn collect<'a>(slabs: impl IntoIterator<Item = &'a Slab>) -> Self {
        slabs.into_iter().fold(Self::default(), |acc, slab| Self {
            slabs: acc.slabs + 1,
            capacity: acc.capacity + slab.capacity(),
            live_bytes: acc.live_bytes + slab.live_bytes(),
            remaining: acc.remaining + slab.remaining_capacity(),
        })
    }
}

impl fmt::Display for ArenaStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocated: {} capacity: {} allocatable: {} from {} blocks",
            self.live_bytes, self.capacity, self.remaining, self.slabs
        )
    }
}
