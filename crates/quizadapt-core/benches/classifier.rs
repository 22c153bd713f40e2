use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizadapt_core::classifier::DifficultyClassifier;
use quizadapt_core::controller::DifficultyController;
use quizadapt_core::features::extract;
use quizadapt_core::history::UserHistory;
use quizadapt_core::model::{AnswerEvent, DifficultyLevel};

fn bench_fit(c: &mut Criterion) {
    c.bench_function("classifier_bootstrap_fit", |b| {
        b.iter(DifficultyClassifier::bootstrap)
    });
}

fn bench_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("primary_path");
    let controller = DifficultyController::new().unwrap();
    let history = UserHistory::from(vec![0.4, 0.8, 0.6, 0.9, 0.7, 0.5]);
    let event = AnswerEvent::new(true, 75.0, Some(0.7));

    group.bench_function("extract", |b| {
        let snapshot = history.to_vec();
        b.iter(|| extract(black_box(&snapshot), black_box(&event)))
    });

    group.bench_function("next_difficulty", |b| {
        b.iter(|| {
            let mut h = history.clone();
            controller.next_difficulty(&mut h, black_box(DifficultyLevel::Intermediate), &event)
        })
    });

    group.bench_function("question_batch_10", |b| {
        b.iter(|| {
            controller.question_difficulties(
                black_box(&history),
                DifficultyLevel::Intermediate,
                10,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_fit, bench_decision);
criterion_main!(benches);
