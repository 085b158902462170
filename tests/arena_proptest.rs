use proptest::prelude::*;
use slabarena::{Arena, ArenaConfig};
use std::ptr::NonNull;

#[derive(Debug, Clone)]
enum Operation {
    Allocate(usize),
    // Index into the live set, taken modulo its length.
    Release(usize),
}

fn operations() -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (0usize..1024).prop_map(Operation::Allocate),
            2 => any::<usize>().prop_map(Operation::Release),
        ],
        1..200,
    )
}

fn aligned(size: usize) -> usize {
    (size + 15) & !15
}

fn assert_disjoint(live: &[(NonNull<u8>, usize)]) {
    let mut ranges: Vec<(usize, usize)> = live
        .iter()
        .filter(|(_, size)| *size > 0)
        .map(|(p, size)| (p.as_ptr() as usize, aligned(*size)))
        .collect();
    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        let (start, len) = pair[0];
        assert!(start + len <= pair[1].0, "live blocks overlap: {:?}", pair);
    }
}

proptest! {
    #[test]
    fn test_blocks_aligned_and_inside_a_slab(sizes in proptest::collection::vec(1usize..512, 1..100)) {
        let mut arena = Arena::new(256).unwrap();
        for size in sizes {
            let p = arena.allocate(size).unwrap();
            let addr = p.as_ptr() as usize;
            prop_assert_eq!(addr % 16, 0);
            prop_assert!(arena
                .slabs()
                .any(|slab| slab.address_range().contains(&addr)
                    && addr + aligned(size) <= slab.address_range().end));
        }
    }

    #[test]
    fn test_random_release_order_never_overlaps(ops in operations()) {
        let mut arena = Arena::with_config(&ArenaConfig::new(512).with_growth_increment(1024)).unwrap();
        let mut live: Vec<(NonNull<u8>, usize)> = Vec::new();
        let mut slab_count = arena.slab_count();

        for op in ops {
            match op {
                Operation::Allocate(size) => {
                    let p = arena.allocate(size).unwrap();
                    live.push((p, size));
                    assert_disjoint(&live);
                }
                Operation::Release(idx) if !live.is_empty() => {
                    let (p, size) = live.swap_remove(idx % live.len());
                    unsafe { arena.deallocate(p, size) };
                }
                Operation::Release(_) => {}
            }

            prop_assert!(arena.slab_count() >= slab_count);
            slab_count = arena.slab_count();

            let expected: usize = live.iter().map(|(_, size)| aligned(*size)).sum();
            prop_assert_eq!(arena.stats().live_bytes, expected);
            for slab in arena.slabs() {
                prop_assert!(slab.live_bytes() <= slab.used());
                prop_assert!(slab.used() <= slab.capacity());
                prop_assert!(slab.capacity().is_power_of_two());
            }
        }

        for (p, size) in live.drain(..) {
            unsafe { arena.deallocate(p, size) };
        }
        prop_assert_eq!(arena.stats().live_bytes, 0);
        for slab in arena.slabs() {
            prop_assert_eq!(slab.used(), 0);
        }
    }

    #[test]
    fn test_lifo_release_restores_every_slab(sizes in proptest::collection::vec(0usize..300, 1..64)) {
        let mut arena = Arena::new(128).unwrap();
        let blocks: Vec<_> = sizes.iter().map(|&size| (arena.allocate(size).unwrap(), size)).collect();

        for (p, size) in blocks.into_iter().rev() {
            unsafe { arena.deallocate(p, size) };
        }
        for slab in arena.slabs() {
            prop_assert_eq!(slab.live_bytes(), 0);
            prop_assert_eq!(slab.used(), 0);
        }
    }
}
