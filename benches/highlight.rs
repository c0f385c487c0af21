use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tilo::highlight::{apply_rules, default_rules, QueryMatcher};

fn create_log_lines(count: usize) -> Vec<String> {
    let levels = ["INFO", "WARN", "ERROR", "DEBUG"];
    (0..count)
        .map(|n| {
            format!(
                "2024-09-02T10:{:02}:{:02}Z {} request {} from 10.0.{}.{} user_{} connected in {}ms https://example.com/api/{}",
                (n / 60) % 60,
                n % 60,
                levels[n % levels.len()],
                n,
                n % 256,
                (n * 7) % 256,
                n % 1000,
                n % 250,
                n
            )
        })
        .collect()
}

fn bench_apply_rules(c: &mut Criterion) {
    let rules = default_rules().expect("built-in rules compile");
    let mut group = c.benchmark_group("apply_rules");

    for &count in &[100usize, 1_000, 10_000] {
        let lines = create_log_lines(count);
        group.bench_with_input(BenchmarkId::new("lines", count), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(apply_rules(black_box(line), &rules));
                }
            })
        });
    }

    group.finish();
}

fn bench_query_ranges(c: &mut Criterion) {
    let lines = create_log_lines(10_000);
    let matcher = QueryMatcher::new("Connected");
    c.bench_function("query_rune_ranges_10k", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(matcher.rune_ranges(black_box(line)));
            }
        })
    });
}

criterion_group!(benches, bench_apply_rules, bench_query_ranges);
criterion_main!(benches);
