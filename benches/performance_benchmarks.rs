use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use liftrs::{
    AthleteLevel, DeloadPolicy, ExerciseType, ImageSize, KinematicsTracker, NormalizedPoint,
    NormalizedRect, OneRepMaxEstimator, OneRepMaxFormula, ProgressionEngine, SharedTracker,
    WarmupPlanner, WorkingSet,
};

/// Performance benchmarks for per-frame tracking and set-level calculations
///
/// Ingestion runs once per camera frame, so it is measured at realistic
/// session lengths (a few seconds to a long set at 60 fps).

fn create_frame_series(count: usize) -> Vec<(NormalizedPoint, f64)> {
    (0..count)
        .map(|i| {
            let t = i as f64 / 60.0;
            // Roughly one rep every two seconds
            let y = 0.5 + 0.15 * (t * std::f64::consts::PI).sin().abs();
            (NormalizedPoint::new(0.5, y), t)
        })
        .collect()
}

fn create_set_history(count: usize) -> Vec<WorkingSet> {
    (0..count)
        .map(|i| WorkingSet::new(i as u32 + 1, 100.0 + (i % 7) as f64 * 2.5, 5, Some(8.0)))
        .collect()
}

fn plate() -> NormalizedRect {
    NormalizedRect::new(0.45, 0.375, 0.14, 0.25)
}

fn bench_tracker_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tracker Ingestion");

    for &frames in &[60, 600, 3600] {
        let series = create_frame_series(frames);

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("ingest", frames), &series, |b, series| {
            b.iter(|| {
                let mut tracker = KinematicsTracker::default();
                let _ = tracker.start(plate(), ImageSize::new(1920.0, 1080.0));
                for (position, timestamp) in series {
                    black_box(tracker.ingest(*position, *timestamp));
                }
                tracker.stats()
            });
        });
    }

    group.finish();
}

fn bench_shared_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Shared Tracker Ingestion");

    for &frames in &[60, 600] {
        let series = create_frame_series(frames);

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::new("ingest", frames), &series, |b, series| {
            b.iter(|| {
                let tracker = SharedTracker::default();
                let Ok(epoch) = tracker.start(plate(), ImageSize::new(1920.0, 1080.0)) else {
                    return;
                };
                for (position, timestamp) in series {
                    black_box(tracker.ingest(epoch, *position, *timestamp));
                }
            });
        });
    }

    group.finish();
}

fn bench_one_rep_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("One Rep Max");

    for formula in [
        OneRepMaxFormula::Epley,
        OneRepMaxFormula::Brzycki,
        OneRepMaxFormula::Lander,
    ] {
        group.bench_function(formula.to_string(), |b| {
            b.iter(|| {
                for reps in 1..=12 {
                    let _ = black_box(OneRepMaxEstimator::estimate(
                        black_box(140.0),
                        reps,
                        formula,
                    ));
                }
            });
        });
    }

    group.finish();
}

fn bench_progression(c: &mut Criterion) {
    let engine = ProgressionEngine::default();

    c.bench_function("next_weight", |b| {
        b.iter(|| {
            engine.next_weight(
                black_box(140.0),
                black_box(5),
                black_box(8.0),
                AthleteLevel::Intermediate,
                ExerciseType::Squat,
            )
        });
    });

    c.bench_function("warmup_generate", |b| {
        let planner = WarmupPlanner::default();
        b.iter(|| planner.generate(black_box(180.0)));
    });
}

fn bench_deload(c: &mut Criterion) {
    let mut group = c.benchmark_group("Deload Decision");
    let policy = DeloadPolicy::default();

    for &size in &[6, 60, 600] {
        let history = create_set_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("decide", size), &history, |b, history| {
            b.iter(|| policy.decide(history, black_box(6), 140.0));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tracker_ingestion,
    bench_shared_ingestion,
    bench_one_rep_max,
    bench_progression,
    bench_deload
);
criterion_main!(benches);
