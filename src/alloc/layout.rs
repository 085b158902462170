//! Size and alignment arithmetic shared by slabs and arenas.

/// Alignment of every slab buffer and every block handed out from one.
pub const SLAB_ALIGN: usize = 16;

/// Capacity used when an arena is built without an explicit size.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Rounds `size` up to the next multiple of [`SLAB_ALIGN`].
///
/// Returns `None` if the rounded value does not fit in a `usize`.
#[inline]
pub const fn align_up(size: usize) -> Option<usize> {
    match size.checked_add(SLAB_ALIGN - 1) {
        Some(padded) => Some(padded & !(SLAB_ALIGN - 1)),
        None => None,
    }
}

/// Capacity of a slab built for `requested` bytes: the next power of two, minimum 1.
#[inline]
pub const fn slab_capacity(requested: usize) -> Option<usize> {
    let requested = if requested == 0 { 1 } else { requested };
    requested.checked_next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0), Some(0));
        for size in 1..=16 {
            assert_eq!(align_up(size), Some(16));
        }
        assert_eq!(align_up(17), Some(32));
        assert_eq!(align_up(100), Some(112));
        assert_eq!(align_up(200), Some(208));
        assert_eq!(align_up(usize::MAX), None);
    }

    #[test]
    fn test_slab_capacity() {
        assert_eq!(slab_capacity(0), Some(1));
        assert_eq!(slab_capacity(1), Some(1));
        assert_eq!(slab_capacity(64), Some(64));
        assert_eq!(slab_capacity(65), Some(128));
        assert_eq!(slab_capacity(1000), Some(1024));
        assert_eq!(slab_capacity(usize::MAX), None);
    }
}
