//! Xuckoo Benchmarks
//!
//! Criterion benchmarks for inserting into and looking up keys in the
//! Xuckoo hash table.
//!
//! To run the benchmarks:
//! ```bash
//! cargo bench --features benchmarking
//! ```

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use std::time::Duration;

use xuckoo_lib::data_structures::xuckoo_hash::{
    IdentityHasher, XuckooHashConfig, XuckooHashTable,
};

/// Spreads sequential indices over the whole key space.
fn scattered_keys(count: u64) -> Vec<u64> {
    (0..count)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .collect()
}

/// Benchmark inserting fresh keys
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("xuckoo_insert");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));

    let config = XuckooHashConfig::new().with_time_tracking(false);

    for size in [100u64, 1_000, 10_000].iter() {
        let keys = scattered_keys(*size);
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("fnv", size), &keys, |b, keys| {
            b.iter(|| {
                let mut table = XuckooHashTable::with_config(config.clone());
                for &key in keys {
                    table.insert(black_box(key));
                }
                table
            });
        });
    }

    // Sequential keys under the identity hasher exercise splitting heavily
    for size in [100u64, 1_000].iter() {
        group.throughput(Throughput::Elements(*size));
        group.bench_with_input(BenchmarkId::new("identity", size), size, |b, &size| {
            b.iter(|| {
                let mut table =
                    XuckooHashTable::with_hasher_and_config(IdentityHasher, config.clone());
                for key in 0..size {
                    table.insert(black_box(key));
                }
                table
            });
        });
    }

    group.finish();
}

/// Benchmark lookups of present and absent keys
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("xuckoo_lookup");
    group.measurement_time(Duration::from_secs(2));

    let size = 10_000u64;
    let keys = scattered_keys(size);
    let mut table = XuckooHashTable::with_config(XuckooHashConfig::new().with_time_tracking(false));
    for &key in &keys {
        table.insert(key);
    }

    group.throughput(Throughput::Elements(size));
    group.bench_function("hit", |b| {
        b.iter(|| {
            for &key in &keys {
                black_box(table.lookup(black_box(key)));
            }
        });
    });

    group.bench_function("miss", |b| {
        b.iter(|| {
            for &key in &keys {
                black_box(table.lookup(black_box(key ^ 1)));
            }
        });
    });

    group.finish();
}

/// Benchmark tearing down a populated table
fn bench_destroy(c: &mut Criterion) {
    let keys = scattered_keys(10_000);
    c.bench_function("xuckoo_destroy", |b| {
        b.iter_batched(
            || {
                let mut table = XuckooHashTable::new();
                for &key in &keys {
                    table.insert(key);
                }
                table
            },
            |table| black_box(table.destroy()),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_insert, bench_lookup, bench_destroy);
criterion_main!(benches);
