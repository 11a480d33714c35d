//! Criterion benchmarks for the scoring hot path.
//!
//! Benchmarks:
//! 1. Indicator frame computation at several series lengths
//! 2. Full score (frame + streak + formula)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gascast_core::{score, IndicatorFrame, PriceSeries, ScoreParameters};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let closes: Vec<f64> = (0..n)
        .map(|i| 3.0 + (i as f64 * 0.1).sin() * 0.8)
        .collect();
    PriceSeries::from_closes(start, &closes).unwrap()
}

fn bench_indicator_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_frame");
    let params = ScoreParameters::default();

    for n in [60, 250, 750] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| IndicatorFrame::compute(black_box(series), black_box(&params)))
        });
    }

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let params = ScoreParameters::default();

    for n in [60, 750] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| score(black_box(series), black_box(&params)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_indicator_frame, bench_score);
criterion_main!(benches);
