use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathforge_core::model::{Difficulty, WindowStats};
use mathforge_core::{AdaptationPolicy, ModelPolicy, PerformanceTracker, RulePolicy};

fn window(accuracy: f64, avg_time: f64) -> WindowStats {
    WindowStats {
        accuracy,
        avg_time,
        correct_streak: 2,
        incorrect_streak: 0,
        recent_problems: 3,
        trend: 0,
    }
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_difficulty");

    group.bench_function("rule_based", |b| {
        let mut policy = RulePolicy::new();
        let stats = window(75.0, 4.0);
        b.iter(|| policy.next_difficulty(black_box(&stats), black_box(Difficulty::Medium)))
    });

    group.bench_function("classifier", |b| {
        let mut policy = ModelPolicy::new();
        let stats = window(75.0, 4.0);
        b.iter(|| policy.next_difficulty(black_box(&stats), black_box(Difficulty::Medium)))
    });

    group.finish();
}

fn bench_pretraining(c: &mut Criterion) {
    c.bench_function("classifier_pretrain", |b| b.iter(ModelPolicy::new));
}

fn bench_tracker_stats(c: &mut Criterion) {
    let mut tracker = PerformanceTracker::new();
    for i in 0..100 {
        tracker.record(
            format!("{i} + {i}"),
            (2 * i) as f64,
            (2 * i) as f64,
            i % 3 != 0,
            3.5,
            Difficulty::Medium,
        );
    }

    c.bench_function("recent_performance_window_10", |b| {
        b.iter(|| tracker.recent_performance(black_box(10)))
    });

    c.bench_function("session_summary_100_attempts", |b| {
        b.iter(|| tracker.summary())
    });
}

criterion_group!(benches, bench_policies, bench_pretraining, bench_tracker_stats);
criterion_main!(benches);
