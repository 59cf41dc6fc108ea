//! Recompute cost benchmark
//!
//! Every point mutation rebuilds the sums with a full pass and refits. This
//! measures that pass, plus the derivation table, at a few point counts.
//!
//! ```bash
//! cargo bench --bench recompute
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lsqcalc::regression::{derive_table_for, fit, Point, RegressionSession, Residuals, SufficientStats};

fn sample_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let x = i as f64 * 0.5;
            let noise = ((i * 7919) % 13) as f64 * 0.01;
            Point::new(i as u64 + 1, x, 2.0 * x - 1.0 + noise)
        })
        .collect()
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pass_fit");
    for n in [10, 100, 1_000, 10_000] {
        let points = sample_points(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                let stats = SufficientStats::from_points(black_box(points));
                fit(&stats, Residuals::Points(points))
            });
        });
    }
    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let points = sample_points(1_000);
    let stats = SufficientStats::from_points(&points);
    let result = fit(&stats, Residuals::Points(&points));
    c.bench_function("derive_table_1000", |b| {
        b.iter(|| derive_table_for(black_box(&points), &result));
    });
}

fn bench_edit_with_history(c: &mut Criterion) {
    let pairs: Vec<(f64, f64)> = sample_points(1_000).iter().map(|p| (p.x, p.y)).collect();
    c.bench_function("session_add_point_1000", |b| {
        b.iter_batched(
            || RegressionSession::with_points(pairs.clone()),
            |mut session| session.add_point(black_box(3.0), black_box(5.0)),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_full_pass, bench_table, bench_edit_with_history);
criterion_main!(benches);
