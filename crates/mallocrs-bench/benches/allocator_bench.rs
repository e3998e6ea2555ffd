//! End-to-end allocator benchmarks against a `MockOs`-backed instance, so
//! results reflect the placement engine rather than kernel syscall latency.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mallocrs_core::{Allocator, MockOs};

fn bench_alloc_free_cycle(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 64, 256, 1024, 4096, 32768];
    let mut group = c.benchmark_group("alloc_free_cycle");

    for &size in sizes {
        group.bench_with_input(BenchmarkId::new("mallocrs", size), &size, |b, &sz| {
            b.iter_batched(
                || Allocator::new(MockOs::default()),
                |mut a| {
                    let p = a.alloc(sz);
                    a.release(criterion::black_box(p));
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_alloc_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_burst");

    group.bench_function("1000x64B", |b| {
        b.iter_batched(
            || Allocator::new(MockOs::default()),
            |mut a| {
                let allocs: Vec<*mut u8> = (0..1000).map(|_| a.alloc(64)).collect();
                criterion::black_box(&allocs);
                for p in allocs {
                    a.release(p);
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_realloc_grow_chain(c: &mut Criterion) {
    c.bench_function("realloc_grow_chain", |b| {
        b.iter_batched(
            || {
                let mut a = Allocator::new(MockOs::default());
                let p = a.alloc(64);
                (a, p)
            },
            |(mut a, p)| {
                let mut p = p;
                for size in [128usize, 256, 512, 1024, 2048] {
                    p = a.realloc(p, size);
                }
                criterion::black_box(p);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_alloc_free_cycle, bench_alloc_burst, bench_realloc_grow_chain);
criterion_main!(benches);
