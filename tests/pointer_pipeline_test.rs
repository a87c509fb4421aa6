//! Integration tests for the core signal path: calibration, displacement
//! mapping and gesture classification working together, with a mock pointer
//! sink standing in for X11.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use face_mouse::calibration::{CalibrationBaseline, Calibrator};
use face_mouse::cursor_control::{MouseButton, PointerSink};
use face_mouse::gesture::{GestureClassifier, GestureEvent};
use face_mouse::mapper::CursorMapper;

/// Records every injected action instead of touching a display server
struct MockPointer {
    position: Cell<(i16, i16)>,
    moves: RefCell<Vec<(i16, i16)>>,
    clicks: RefCell<Vec<MouseButton>>,
    double_clicks: Cell<usize>,
}

impl MockPointer {
    fn new(x: i16, y: i16) -> Self {
        Self {
            position: Cell::new((x, y)),
            moves: RefCell::new(Vec::new()),
            clicks: RefCell::new(Vec::new()),
            double_clicks: Cell::new(0),
        }
    }
}

impl PointerSink for MockPointer {
    fn position(&self) -> face_mouse::Result<(i16, i16)> {
        Ok(self.position.get())
    }

    fn move_to(&self, x: i16, y: i16, _duration: Duration) -> face_mouse::Result<()> {
        self.position.set((x, y));
        self.moves.borrow_mut().push((x, y));
        Ok(())
    }

    fn click(&self, button: MouseButton) -> face_mouse::Result<()> {
        self.clicks.borrow_mut().push(button);
        Ok(())
    }

    fn double_click(&self) -> face_mouse::Result<()> {
        self.double_clicks.set(self.double_clicks.get() + 1);
        Ok(())
    }

    fn screen_size(&self) -> (u16, u16) {
        (1920, 1080)
    }
}

/// Drive one simulated frame: map the nose position, move the pointer,
/// classify the openness ratios and inject the resulting clicks.
fn process_frame(
    mapper: &CursorMapper,
    classifier: &mut GestureClassifier,
    pointer: &MockPointer,
    nose: (f32, f32),
    left: f64,
    right: f64,
    now: Instant,
) {
    let cursor = pointer.position().unwrap();
    let (x, y) = mapper.target(nose, cursor);
    pointer.move_to(x, y, Duration::ZERO).unwrap();

    for event in classifier.classify(left, right, now) {
        match event {
            GestureEvent::LeftClick => pointer.click(MouseButton::Left).unwrap(),
            GestureEvent::RightClick => pointer.click(MouseButton::Right).unwrap(),
            GestureEvent::DoubleClick => pointer.double_click().unwrap(),
        }
    }
}

#[test]
fn held_head_offset_keeps_drifting_the_cursor() {
    let baseline = CalibrationBaseline { x: 100.0, y: 100.0 };
    let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
    let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
    let pointer = MockPointer::new(500, 300);
    let start = Instant::now();

    // nose held 10 px right of neutral, eyes open
    for _ in 0..3 {
        process_frame(&mapper, &mut classifier, &pointer, (110.0, 100.0), 0.6, 0.6, start);
    }

    // +25 px per frame, cumulative: the displacement is never consumed
    assert_eq!(*pointer.moves.borrow(), vec![(525, 300), (550, 300), (575, 300)]);
    assert!(pointer.clicks.borrow().is_empty());
}

#[test]
fn neutral_head_never_moves_the_cursor() {
    let baseline = CalibrationBaseline { x: 100.0, y: 100.0 };
    let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
    let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
    let pointer = MockPointer::new(640, 400);

    for _ in 0..5 {
        process_frame(
            &mapper,
            &mut classifier,
            &pointer,
            (100.0, 100.0),
            0.6,
            0.6,
            Instant::now(),
        );
    }

    assert!(pointer.moves.borrow().iter().all(|&m| m == (640, 400)));
}

#[test]
fn drift_stops_at_the_screen_edge() {
    let baseline = CalibrationBaseline { x: 100.0, y: 100.0 };
    let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
    let mut classifier = GestureClassifier::default();
    let pointer = MockPointer::new(1900, 1070);

    for _ in 0..4 {
        process_frame(&mapper, &mut classifier, &pointer, (150.0, 150.0), 0.6, 0.6, Instant::now());
    }

    assert_eq!(pointer.position().unwrap(), (1919, 1079));
}

#[test]
fn sustained_wink_produces_one_click_per_cooldown() {
    let baseline = CalibrationBaseline { x: 100.0, y: 100.0 };
    let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
    let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
    let pointer = MockPointer::new(500, 300);
    let start = Instant::now();

    // a left wink held across 30 frames at ~30 fps
    for frame in 0..30 {
        let now = start + Duration::from_millis(33 * frame);
        process_frame(&mapper, &mut classifier, &pointer, (100.0, 100.0), 0.2, 0.6, now);
    }

    // ~990 ms of frames: only the first fires
    assert_eq!(*pointer.clicks.borrow(), vec![MouseButton::Left]);

    // one more frame past the cooldown fires again
    process_frame(
        &mapper,
        &mut classifier,
        &pointer,
        (100.0, 100.0),
        0.2,
        0.6,
        start + Duration::from_millis(1050),
    );
    assert_eq!(pointer.clicks.borrow().len(), 2);
}

#[test]
fn both_eyes_closed_double_clicks_without_single_clicks() {
    let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
    let pointer = MockPointer::new(500, 300);
    let mapper = CursorMapper::new(CalibrationBaseline { x: 0.0, y: 0.0 }, 2.5, 1920, 1080);
    let start = Instant::now();

    process_frame(&mapper, &mut classifier, &pointer, (0.0, 0.0), 0.2, 0.2, start);

    assert_eq!(pointer.double_clicks.get(), 1);
    assert!(pointer.clicks.borrow().is_empty());
}

#[test]
fn calibrated_baseline_feeds_the_mapper() {
    // the calibrator retries through no-face frames, then freezes the first
    // detected nose position
    let calibrator = Calibrator::new(Duration::from_millis(1), None);
    let mut frames = vec![None, None, None, Some((100.0f32, 150.0f32))].into_iter();
    let baseline = calibrator
        .sample_until_face_found(|| Ok(frames.next().flatten()))
        .unwrap();
    assert_eq!(baseline, CalibrationBaseline { x: 100.0, y: 150.0 });

    let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
    let pointer = MockPointer::new(500, 300);

    // the same nose position afterwards means zero displacement
    let cursor = pointer.position().unwrap();
    assert_eq!(mapper.target((100.0, 150.0), cursor), (500, 300));
}
