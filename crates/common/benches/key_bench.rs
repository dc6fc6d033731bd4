//! Fingerprint key benchmarks
//!
//! Benchmarks for building keys, hashing them into maps and comparing keys
//! with sequence-shaped factors.
//!
//! Run with: `cargo bench --bench key_bench -p sqlcache-common --features
//! foundation`

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sqlcache_common::key::{Factor, FingerprintKey, QueryKeyBuilder, RowBounds};

fn build_key(params: usize) -> FingerprintKey {
    QueryKeyBuilder::new("users.search")
        .bounds(RowBounds::new(0, 50))
        .sql("SELECT * FROM users WHERE name LIKE ? AND tags && ?")
        .bind_all((0..params as i64).map(Factor::from))
        .bind(vec!["admin", "ops", "billing"])
        .build()
}

fn bench_key_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_build");

    for params in [1, 8, 64] {
        group.throughput(Throughput::Elements(params as u64));
        group.bench_with_input(BenchmarkId::new("params", params), &params, |b, &params| {
            b.iter(|| black_box(build_key(black_box(params))));
        });
    }

    group.finish();
}

fn bench_key_eq(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_eq");

    for params in [1, 8, 64] {
        let left = build_key(params);
        let right = build_key(params);
        group.bench_with_input(BenchmarkId::new("equal", params), &params, |b, _| {
            b.iter(|| black_box(black_box(&left) == black_box(&right)));
        });
    }

    group.finish();
}

fn bench_key_map_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_map_lookup");
    group.throughput(Throughput::Elements(1));

    let map: HashMap<FingerprintKey, usize> = (0..1000)
        .map(|id| {
            let key = QueryKeyBuilder::new("orders.selectById")
                .sql("SELECT * FROM orders WHERE id = ?")
                .bind(id)
                .build();
            (key, id as usize)
        })
        .collect();
    let lookup_key = QueryKeyBuilder::new("orders.selectById")
        .sql("SELECT * FROM orders WHERE id = ?")
        .bind(500)
        .build();

    group.bench_function("hit", |b| {
        b.iter(|| black_box(map.get(black_box(&lookup_key))));
    });

    group.finish();
}

criterion_group!(benches, bench_key_build, bench_key_eq, bench_key_map_lookup);
criterion_main!(benches);
