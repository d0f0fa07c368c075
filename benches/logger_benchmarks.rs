//! Criterion benchmarks for rust_kvlog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_kvlog::prelude::*;
use std::io;
use std::sync::Arc;
use std::thread;

const PARALLEL_THREADS: usize = 4;
const LINES_PER_THREAD: usize = 250;

fn configurations() -> Vec<(&'static str, LogFlags)> {
    vec![
        ("base", LogFlags::NONE),
        ("sorted_keys", LogFlags::SORT),
        ("datetime", LogFlags::TIME),
        ("shortfile", LogFlags::CALLER | LogFlags::SHORT_CALLER),
        ("longfile", LogFlags::CALLER),
        ("like_stdlib", LogFlags::TIME | LogFlags::CALLER | LogFlags::SHORT_CALLER),
        ("escaped", LogFlags::ESCAPE),
    ]
}

// ============================================================================
// Serial Logging Benchmarks
// ============================================================================

fn bench_serial_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_logging");
    group.throughput(Throughput::Elements(1));
    let attrs = LogMap::new().with("x", 42);

    for (name, flags) in configurations() {
        let logger = Logger::new(io::sink(), flags);
        group.bench_function(name, |b| {
            b.iter(|| {
                logger.info(
                    black_box("this is a test: %s"),
                    &[LogArg::from("ok"), LogArg::from(&attrs)],
                );
            });
        });
    }

    let enabled = Logger::new(io::sink(), LogFlags::DEBUG);
    group.bench_function("debug_enabled", |b| {
        b.iter(|| enabled.debug(black_box("this is a test"), &[LogArg::from(&attrs)]));
    });

    let disabled = Logger::new(io::sink(), LogFlags::NONE);
    group.bench_function("debug_disabled", |b| {
        b.iter(|| disabled.debug(black_box("this is a test"), &[LogArg::from(&attrs)]));
    });

    group.finish();
}

// ============================================================================
// Parallel Logging Benchmarks
// ============================================================================

fn bench_parallel_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_logging");
    group.throughput(Throughput::Elements((PARALLEL_THREADS * LINES_PER_THREAD) as u64));

    for (name, flags) in configurations() {
        let logger = Arc::new(Logger::new(io::sink(), flags));
        group.bench_function(name, |b| {
            b.iter(|| {
                thread::scope(|scope| {
                    for _ in 0..PARALLEL_THREADS {
                        let logger = Arc::clone(&logger);
                        scope.spawn(move || {
                            let attrs = LogMap::new().with("x", 42);
                            for _ in 0..LINES_PER_THREAD {
                                logger.info(
                                    black_box("this is a test: %s"),
                                    &[LogArg::from("ok"), LogArg::from(&attrs)],
                                );
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

// ============================================================================
// Attribute Serialization Benchmarks
// ============================================================================

fn bench_map_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_serialization");
    group.throughput(Throughput::Elements(1));

    let map: LogMap = (0..16).map(|i| (format!("key_{:02}", i), i)).collect();
    let mut out = Vec::with_capacity(512);

    group.bench_function("write_to", |b| {
        b.iter(|| {
            out.clear();
            black_box(map.write_to(&mut out).ok())
        });
    });

    group.bench_function("sorted_write_to", |b| {
        b.iter(|| {
            out.clear();
            black_box(map.sorted_write_to(&mut out).ok())
        });
    });

    group.finish();
}

// ============================================================================
// Message Formatting Benchmarks
// ============================================================================

fn bench_printf(c: &mut Criterion) {
    let mut group = c.benchmark_group("printf");
    group.throughput(Throughput::Elements(1));

    let args = [
        FieldValue::from(42),
        FieldValue::from("disk"),
        FieldValue::from(0.75),
    ];
    group.bench_function("mixed_verbs", |b| {
        b.iter(|| black_box(rust_kvlog::printf::format("%05d errors on %s at %.2f", &args)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_serial_logging,
    bench_parallel_logging,
    bench_map_serialization,
    bench_printf
);
criterion_main!(benches);
