use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use slabarena::{ArenaAlloc, ArenaAllocator, ArenaScope};
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

const ITERATIONS: usize = 100_000;
const PRE_ALLOC_SIZE: usize = 1024 * 1024;
const FIXED_COUNT: usize = 100;
const MAX_RANDOM_COUNT: usize = 1024;

struct XorShift64 {
    a: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { a: if seed == 0 { 1 } else { seed } }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.a;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.a = x;
        x
    }

    fn below(&mut self, max: usize) -> usize {
        self.next() as usize % max
    }
}

/// The system allocator behind the same two operations, as a baseline.
struct SystemAlloc;

impl SystemAlloc {
    fn layout(count: usize) -> Layout {
        Layout::from_size_align(count.max(1), 16).unwrap()
    }

    fn allocate(&self, count: usize) -> NonNull<u8> {
        NonNull::new(unsafe { alloc(Self::layout(count)) }).unwrap()
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, count: usize) {
        dealloc(ptr.as_ptr(), Self::layout(count));
    }
}

macro_rules! workloads {
    ($allocate:expr, $deallocate:expr) => {{
        let allocate = $allocate;
        let deallocate = $deallocate;

        move |workload: &str| match workload {
            "pairs" => {
                for _ in 0..ITERATIONS {
                    let p = allocate(FIXED_COUNT);
                    black_box(p);
                    deallocate(p, FIXED_COUNT);
                }
            }
            "random_fixed" => {
                let mut rng = XorShift64::new(0xdead_beef);
                let mut live = Vec::new();
                for _ in 0..ITERATIONS {
                    if rng.next() % 2 == 1 {
                        live.push(allocate(FIXED_COUNT));
                    } else if !live.is_empty() {
                        let idx = rng.below(live.len());
                        deallocate(live.swap_remove(idx), FIXED_COUNT);
                    }
                }
                for p in live {
                    deallocate(p, FIXED_COUNT);
                }
            }
            _ => {
                let mut rng = XorShift64::new(0x5eed);
                let mut live = Vec::new();
                for _ in 0..ITERATIONS {
                    let count = rng.below(MAX_RANDOM_COUNT);
                    if rng.next() % 2 == 1 {
                        live.push((allocate(count), count));
                    } else if !live.is_empty() {
                        let idx = rng.below(live.len());
                        let (p, n) = live.swap_remove(idx);
                        deallocate(p, n);
                    }
                }
                for (p, n) in live {
                    deallocate(p, n);
                }
            }
        }
    }};
}

fn bench_workloads(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_workloads");
    group.throughput(Throughput::Elements(ITERATIONS as u64));
    group.sample_size(10);

    for workload in ["pairs", "random_fixed", "random_size"] {
        group.bench_function(format!("system/{workload}"), |b| {
            let system = SystemAlloc;
            let run = workloads!(
                |n| system.allocate(n),
                |p, n| unsafe { system.deallocate(p, n) }
            );
            b.iter(|| run(workload));
        });

        group.bench_function(format!("instance_owned/{workload}"), |b| {
            let arena = ArenaAllocator::<u8>::new(PRE_ALLOC_SIZE).unwrap();
            let run = workloads!(
                |n| arena.allocate(n).unwrap(),
                |p, n| unsafe { arena.deallocate(p, n) }
            );
            b.iter(|| run(workload));
        });

        group.bench_function(format!("scope_shared/{workload}"), |b| {
            let scope = ArenaScope::new();
            let arena = scope.allocator::<u8>().unwrap();
            let run = workloads!(
                |n| arena.allocate(n).unwrap(),
                |p, n| unsafe { arena.deallocate(p, n) }
            );
            b.iter(|| run(workload));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_workloads);
criterion_main!(benches);
