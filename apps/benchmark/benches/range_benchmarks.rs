use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use depgraph_benchmark::SAMPLE_RANGES;
use depgraph_resolver::{build_range_advice, describe_range, find_max_satisfying, normalize_range};

const AVAILABLE: &[&str] = &[
    "0.4.0", "0.4.7", "1.0.0", "1.2.3", "1.2.4", "1.9.0", "2.0.0-rc.1", "2.0.0", "2.1.0", "3.0.0",
];

fn normalize(c: &mut Criterion) {
    c.bench_function("normalize_range", |b| {
        b.iter(|| {
            for range in SAMPLE_RANGES {
                black_box(normalize_range(black_box(range)));
            }
        });
    });
}

fn max_satisfying(c: &mut Criterion) {
    c.bench_function("find_max_satisfying", |b| {
        b.iter(|| {
            for range in SAMPLE_RANGES {
                black_box(find_max_satisfying(
                    black_box(range),
                    AVAILABLE.iter().copied(),
                ));
            }
        });
    });
}

fn advice(c: &mut Criterion) {
    c.bench_function("range_advice", |b| {
        b.iter(|| {
            for range in SAMPLE_RANGES {
                black_box(describe_range(range));
                black_box(build_range_advice(range, Some("1.2.3"), Some("3.0.0")));
            }
        });
    });
}

criterion_group!(benches, normalize, max_satisfying, advice);
criterion_main!(benches);
