use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logpress_rs::{AdjacencyGraph, Compressor, Line, RuleSet};

/// Generate repetitive log lines
fn generate_repetitive_log(lines: usize) -> Vec<String> {
    let patterns = [
        "worker {} saw connection reset by peer",
        "user {} logged in from gateway",
        "request {} served in {}ms",
        "cache miss for key {} in region",
    ];

    (0..lines)
        .map(|i| {
            patterns[i % patterns.len()]
                .replacen("{}", &i.to_string(), 1)
                .replacen("{}", &(i * 7 % 1000).to_string(), 1)
        })
        .collect()
}

/// Generate low-repetition lines (random words)
fn generate_low_repetition(lines: usize) -> Vec<String> {
    let chars = "abcdefghijklmnopqrstuvwxyz";
    let mut seed = 12345u64;
    let mut next = || {
        // Simple LCG random
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        seed
    };

    (0..lines)
        .map(|_| {
            (0..8)
                .map(|_| {
                    (0..5)
                        .map(|_| {
                            let idx = (next() % chars.len() as u64) as usize;
                            chars.as_bytes()[idx] as char
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_compress_repetitive(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let mut group = c.benchmark_group("repetitive_log");

    for size in sizes.iter() {
        let data = generate_repetitive_log(*size);

        group.bench_with_input(BenchmarkId::new("Compressor", size), &data, |b, data| {
            b.iter(|| {
                let mut compressor = Compressor::new();
                compressor.extend(black_box(data));
                black_box(compressor.finish())
            });
        });
    }

    group.finish();
}

fn bench_compress_low_repetition(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let mut group = c.benchmark_group("low_repetition");

    for size in sizes.iter() {
        let data = generate_low_repetition(*size);

        group.bench_with_input(BenchmarkId::new("Compressor", size), &data, |b, data| {
            b.iter(|| {
                let mut compressor = Compressor::new();
                compressor.extend(black_box(data));
                black_box(compressor.finish())
            });
        });
    }

    group.finish();
}

fn bench_components(c: &mut Criterion) {
    let data = generate_repetitive_log(1_000);
    let mut group = c.benchmark_group("components");

    group.bench_function("encode", |b| {
        b.iter(|| {
            for line in &data {
                black_box(Line::from_raw(black_box(line)));
            }
        });
    });

    let bodies: Vec<String> = data
        .iter()
        .map(|line| Line::from_raw(line).body().to_string())
        .collect();

    group.bench_function("walk_line", |b| {
        b.iter(|| {
            let mut graph = AdjacencyGraph::new();
            for body in &bodies {
                black_box(graph.walk_line(black_box(body)));
            }
        });
    });

    let mut rules = RuleSet::new();
    for body in &bodies[..8] {
        let words: Vec<&str> = body.split_whitespace().collect();
        for pair in words.windows(2) {
            rules.induce_phrase(pair[0], pair[1]);
        }
    }

    group.bench_function("apply_all", |b| {
        b.iter(|| {
            for body in &bodies {
                black_box(rules.apply_all(black_box(body)));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compress_repetitive,
    bench_compress_low_repetition,
    bench_components
);
criterion_main!(benches);
