//! Benchmarks the allocators this crate provides against one another.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polyarena::{Allocator, Arena, Heap, SharedArena};

fn bench_heap_alloc(c: &mut Criterion) {
    let heap = Heap::new();
    c.bench_function("heap_alloc_64b", |b| {
        b.iter(|| {
            let layout = std::alloc::Layout::from_size_align(64, 8).unwrap();
            let ptr = heap.alloc(layout);
            unsafe { heap.dealloc(black_box(ptr), layout) };
        })
    });
}

fn bench_arena_alloc(c: &mut Criterion) {
    c.bench_function("arena_alloc_64b", |b| {
        let arena = Arena::new(64 * 1024);
        b.iter(|| {
            black_box(arena.alloc_bytes(64));
        })
    });
}

fn bench_arena_rewind_cycle(c: &mut Criterion) {
    c.bench_function("arena_alloc_then_rewind_1000", |b| {
        let arena = Arena::new(64 * 1024);
        b.iter(|| {
            let mark = arena.peek();
            for _ in 0..1000 {
                black_box(arena.alloc_bytes(32));
            }
            unsafe { arena.rewind(mark) };
        })
    });
}

fn bench_shared_arena_alloc(c: &mut Criterion) {
    c.bench_function("shared_arena_alloc_64b", |b| {
        let arena = SharedArena::new(64 * 1024);
        b.iter(|| {
            black_box(arena.alloc_bytes(64));
        })
    });
}

criterion_group!(
    benches,
    bench_heap_alloc,
    bench_arena_alloc,
    bench_arena_rewind_cycle,
    bench_shared_arena_alloc
);
criterion_main!(benches);
