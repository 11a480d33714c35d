//! Criterion benchmarks for rolling accuracy.
//!
//! Run with: `cargo bench -p gascast-runner`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gascast_core::{PriceSeries, ScoreParameters};
use gascast_runner::rolling_accuracy;

fn make_series(n: usize) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let closes: Vec<f64> = (0..n)
        .map(|i| 3.0 + (i as f64 * 0.13).sin() * 0.6)
        .collect();
    PriceSeries::from_closes(start, &closes).unwrap()
}

fn bench_rolling_accuracy(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_accuracy");
    group.sample_size(20);
    let params = ScoreParameters::default();

    for (n, stride) in [(120, 1), (500, 1), (500, 10)] {
        let series = make_series(n);
        group.bench_with_input(
            BenchmarkId::new(format!("stride_{stride}"), n),
            &series,
            |b, series| {
                b.iter(|| rolling_accuracy(black_box(series), black_box(&params), 30, stride))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_rolling_accuracy);
criterion_main!(benches);
