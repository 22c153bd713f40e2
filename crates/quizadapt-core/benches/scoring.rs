use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizadapt_core::model::AnswerEvent;
use quizadapt_core::scoring::{evaluate, performance_score};
use quizadapt_core::statistics::analyze;

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    group.bench_function("fast_correct", |b| {
        b.iter(|| evaluate(black_box("A"), black_box("A"), black_box(30.0), Some(0.9)))
    });

    group.bench_function("incorrect", |b| {
        b.iter(|| evaluate(black_box("B"), black_box("A"), black_box(200.0), None))
    });

    group.bench_function("performance_score", |b| {
        let event = AnswerEvent::new(true, 120.0, Some(0.6));
        b.iter(|| performance_score(black_box(&event)))
    });

    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");
    let full: Vec<f64> = (0..20).map(|i| (i % 7) as f64 / 7.0).collect();

    let empty: Vec<f64> = Vec::new();

    group.bench_function("empty", |b| b.iter(|| analyze(black_box(&empty))));
    group.bench_function("full_window", |b| b.iter(|| analyze(black_box(&full))));

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_analytics);
criterion_main!(benches);
