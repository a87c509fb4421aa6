//! Benchmarks for the per-frame math: openness estimation, displacement
//! mapping and gesture classification. These run once per captured frame,
//! so they must stay far below the frame budget.

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use face_mouse::calibration::CalibrationBaseline;
use face_mouse::constants::EYE_CONTOUR_POINTS;
use face_mouse::gesture::GestureClassifier;
use face_mouse::mapper::CursorMapper;
use face_mouse::openness::eye_aspect_ratio;

fn eye_contour() -> [(f32, f32); EYE_CONTOUR_POINTS] {
    let mut contour = [(0.0f32, 0.0f32); EYE_CONTOUR_POINTS];
    contour[0] = (100.0, 200.0);
    contour[8] = (140.0, 200.0);
    for k in 1..8 {
        contour[k] = (100.0 + 5.0 * k as f32, 192.0);
        contour[16 - k] = (100.0 + 5.0 * k as f32, 208.0);
    }
    contour
}

fn bench_eye_aspect_ratio(c: &mut Criterion) {
    let contour = eye_contour();
    c.bench_function("eye_aspect_ratio", |b| {
        b.iter(|| eye_aspect_ratio(black_box(&contour)));
    });
}

fn bench_cursor_mapping(c: &mut Criterion) {
    let mapper = CursorMapper::new(
        CalibrationBaseline { x: 320.0, y: 240.0 },
        2.5,
        1920,
        1080,
    );
    c.bench_function("cursor_target", |b| {
        b.iter(|| mapper.target(black_box((335.0, 250.0)), black_box((960, 540))));
    });
}

fn bench_gesture_classification(c: &mut Criterion) {
    let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
    let now = Instant::now();
    c.bench_function("gesture_classify", |b| {
        b.iter(|| classifier.classify(black_box(0.5), black_box(0.5), now));
    });
}

criterion_group!(
    benches,
    bench_eye_aspect_ratio,
    bench_cursor_mapping,
    bench_gesture_classification
);
criterion_main!(benches);
