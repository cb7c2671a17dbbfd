//! Service Instance Benchmarks
//!
//! Measures the wire codec and load balancer selection.
//!
//! Run with: cargo bench -p soa-discovery --bench discovery_benchmarks

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use soa_discovery::{HostAndPort, LoadBalanceAlgorithm, RandomAlgorithm, ServiceInstance};
use std::hint::black_box;

fn candidates(count: u16) -> Vec<ServiceInstance> {
    (1..=count)
        .map(|port| {
            ServiceInstance::new("FooService", HostAndPort::from_parts("server", port), None)
                .expect("valid instance")
        })
        .collect()
}

// ============================================================================
// Codec Benchmarks
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let instance = ServiceInstance::new(
        "FooService",
        HostAndPort::from_parts("server", 8080),
        Some("x".repeat(256)),
    )
    .expect("valid instance");
    let json = instance.to_json();

    group.bench_function("encode", |b| b.iter(|| black_box(&instance).to_json()));
    group.bench_function("decode", |b| {
        b.iter(|| ServiceInstance::from_json(black_box(&json)))
    });

    group.finish();
}

// ============================================================================
// Selection Benchmarks
// ============================================================================

fn bench_random_choose(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_choose");

    for count in [1u16, 10, 100] {
        let instances = candidates(count);
        let thread_local = RandomAlgorithm::new();
        let seeded = RandomAlgorithm::with_seed(42);

        group.bench_with_input(BenchmarkId::new("thread_rng", count), &instances, |b, i| {
            b.iter(|| thread_local.choose(black_box(i)).map(|c| c.port()))
        });
        group.bench_with_input(BenchmarkId::new("seeded", count), &instances, |b, i| {
            b.iter(|| seeded.choose(black_box(i)).map(|c| c.port()))
        });
        group.bench_with_input(BenchmarkId::new("choose_from", count), &instances, |b, i| {
            b.iter(|| thread_local.choose_from(black_box(i).iter().cloned()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_random_choose);
criterion_main!(benches);
