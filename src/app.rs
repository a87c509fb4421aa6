//! Main application module: the per-frame pipeline driver.
//!
//! Owns the capture device, the two detectors, the calibrated cursor mapper
//! and the gesture classifier, and runs the synchronous frame loop: capture,
//! detect, estimate openness, map the cursor, classify gestures, act, render.
//! A frame with no face skips all decision logic; only capture failure or a
//! user quit leaves the loop. External resources are released on every exit
//! path, including unwinds.

use std::io::{stdin, stdout};
use std::time::{Duration, Instant};

use log::{info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

use crate::{
    calibration::Calibrator,
    config::Config,
    cursor_control::{CursorController, MouseButton, PointerSink},
    face_detection::FaceDetector,
    gesture::{GestureClassifier, GestureEvent},
    landmarks::{Eye, LandmarkSet},
    mapper::CursorMapper,
    mesh_detection::MeshDetector,
    openness::eye_aspect_ratio,
    utils::{safe_cast::f32_to_i32_clamp, square_face_box},
    Error, Result,
};

/// Margin added around the detected face before the mesh crop
const FACE_BOX_EXPANSION: f32 = 0.2;

/// Preview window title
const PREVIEW_WINDOW: &str = "Face Mouse";

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Main application struct
pub struct FaceMouseApp {
    config: Config,
    video_capture: VideoCapture,
    face_detector: FaceDetector,
    mesh_detector: MeshDetector,
    classifier: GestureClassifier,
    pointer: Option<Box<dyn PointerSink>>,
    mapper: Option<CursorMapper>,
    preview_open: bool,
}

impl FaceMouseApp {
    /// Create the application: open the video source, load both models and
    /// connect the pointer sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture device or a model cannot be opened.
    pub fn new(config: Config, source: VideoSource) -> Result<Self> {
        info!("Initializing face-mouse application");
        config.validate()?;

        let video_capture = match &source {
            VideoSource::Camera(index) => {
                info!("Opening camera {index}");
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                // keep latency low on live capture
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {path}");
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        let face_detector = FaceDetector::new(
            &config.models.face_detector,
            config.models.confidence_threshold,
        )?;
        let mesh_detector = MeshDetector::new(&config.models.face_mesh)?;

        let classifier = GestureClassifier::new(
            config.gesture.blink_threshold,
            Duration::from_secs_f64(config.gesture.cooldown_secs),
        );

        let pointer: Option<Box<dyn PointerSink>> = if config.cursor.enabled {
            match CursorController::new() {
                Ok(controller) => Some(Box::new(controller)),
                Err(e) => {
                    warn!("Pointer injection unavailable, running detection only: {e}");
                    None
                }
            }
        } else {
            info!("Cursor control disabled, running detection only");
            None
        };

        let preview_open = config.display.preview;
        if preview_open {
            highgui::named_window(PREVIEW_WINDOW, WINDOW_NORMAL)?;
        }

        Ok(Self {
            config,
            video_capture,
            face_detector,
            mesh_detector,
            classifier,
            pointer,
            mapper: None,
            preview_open,
        })
    }

    /// Run calibration: prompt the user, then sample frames until a face is
    /// found and freeze its nose position as the session baseline.
    ///
    /// # Errors
    ///
    /// Returns an error on capture failure, prompt I/O failure, or an
    /// exhausted retry cap.
    pub fn calibrate(&mut self) -> Result<()> {
        Calibrator::await_ready_signal(&mut stdin().lock(), &mut stdout())?;

        let calibrator = Calibrator::new(
            Duration::from_secs_f64(self.config.calibration.retry_delay_secs),
            self.config.calibration.max_retries,
        );

        let mirror = self.config.display.mirror;
        let video_capture = &mut self.video_capture;
        let face_detector = &mut self.face_detector;
        let mesh_detector = &self.mesh_detector;

        let baseline = calibrator.sample_until_face_found(|| {
            let frame = read_frame(video_capture, mirror)?
                .ok_or_else(|| Error::Calibration("capture ended during calibration".to_string()))?;
            Ok(detect_landmarks(face_detector, mesh_detector, &frame)?.map(|set| set.nose_tip()))
        })?;

        if let Some(pointer) = &self.pointer {
            let (width, height) = pointer.screen_size();
            self.mapper = Some(CursorMapper::new(
                baseline,
                self.config.cursor.gain,
                width,
                height,
            ));
        }
        Ok(())
    }

    /// Run the main frame loop until quit or capture failure.
    ///
    /// # Errors
    ///
    /// Per-frame anomalies are handled locally; only capture-level failures
    /// propagate.
    pub fn run(&mut self) -> Result<()> {
        info!("Entering main loop");
        let move_duration = Duration::from_secs_f64(self.config.cursor.move_duration_secs);

        loop {
            let Some(frame) = read_frame(&mut self.video_capture, self.config.display.mirror)?
            else {
                info!("No more frames available, shutting down");
                break;
            };

            // per-frame anomalies skip the frame's decision logic, never
            // the loop
            let landmarks =
                match detect_landmarks(&mut self.face_detector, &self.mesh_detector, &frame) {
                    Ok(landmarks) => landmarks,
                    Err(e) => {
                        warn!("Skipping frame: {e}");
                        None
                    }
                };

            if let Some(set) = &landmarks {
                self.drive_pointer(set, move_duration);
                self.fire_gestures(set);
            }

            if self.preview_open {
                self.render(&frame, landmarks.as_ref())?;
                let key = highgui::wait_key(1)?;
                if key == 27 || key == i32::from(b'q') {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        self.release();
        Ok(())
    }

    /// Move the pointer by the calibrated nose displacement.
    ///
    /// Pointer errors are logged and swallowed; they never unwind the loop.
    fn drive_pointer(&mut self, landmarks: &LandmarkSet, move_duration: Duration) {
        let (Some(pointer), Some(mapper)) = (&self.pointer, &self.mapper) else {
            return;
        };

        let outcome = pointer.position().and_then(|cursor| {
            let (x, y) = mapper.target(landmarks.nose_tip(), cursor);
            pointer.move_to(x, y, move_duration)
        });
        if let Err(e) = outcome {
            warn!("Pointer move failed: {e}");
        }
    }

    /// Classify eye closures and inject the resulting clicks
    fn fire_gestures(&mut self, landmarks: &LandmarkSet) {
        let left = eye_aspect_ratio(&landmarks.eye_contour(Eye::Left));
        let right = eye_aspect_ratio(&landmarks.eye_contour(Eye::Right));

        for event in self.classifier.classify(left, right, Instant::now()) {
            let outcome = match (event, &self.pointer) {
                (GestureEvent::LeftClick, Some(pointer)) => pointer.click(MouseButton::Left),
                (GestureEvent::RightClick, Some(pointer)) => pointer.click(MouseButton::Right),
                (GestureEvent::DoubleClick, Some(pointer)) => pointer.double_click(),
                (_, None) => Ok(()),
            };
            match outcome {
                Ok(()) => info!("{event:?}"),
                Err(e) => warn!("Click injection failed: {e}"),
            }
        }
    }

    /// Draw the landmark overlay and show the preview frame
    fn render(&self, frame: &Mat, landmarks: Option<&LandmarkSet>) -> Result<()> {
        let mut display = frame.clone();

        if let Some(set) = landmarks {
            let max_x = display.cols() - 1;
            let max_y = display.rows() - 1;
            for &(x, y) in set.points() {
                imgproc::circle(
                    &mut display,
                    Point::new(f32_to_i32_clamp(x, 0, max_x), f32_to_i32_clamp(y, 0, max_y)),
                    1,
                    Scalar::new(0.0, 255.0, 0.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
            }
        }

        highgui::imshow(PREVIEW_WINDOW, &display)?;
        Ok(())
    }

    /// Release the capture device and close any windows
    fn release(&mut self) {
        if let Err(e) = self.video_capture.release() {
            warn!("Failed to release capture device: {e}");
        }
        if self.preview_open {
            if let Err(e) = highgui::destroy_all_windows() {
                warn!("Failed to close windows: {e}");
            }
            self.preview_open = false;
        }
    }
}

impl Drop for FaceMouseApp {
    fn drop(&mut self) {
        // cleanup must run even on abrupt unwinds
        self.release();
    }
}

/// Read and optionally mirror one frame; `Ok(None)` means the stream ended
fn read_frame(capture: &mut VideoCapture, mirror: bool) -> Result<Option<Mat>> {
    let mut frame = Mat::default();
    if !capture.read(&mut frame)? || frame.empty() {
        return Ok(None);
    }

    if mirror {
        let mut flipped = Mat::default();
        opencv::core::flip(&frame, &mut flipped, 1)?;
        frame = flipped;
    }
    Ok(Some(frame))
}

/// Detect the primary face and its mesh; `Ok(None)` when no face is found
fn detect_landmarks(
    face_detector: &mut FaceDetector,
    mesh_detector: &MeshDetector,
    frame: &Mat,
) -> Result<Option<LandmarkSet>> {
    let Some(face) = face_detector.detect_primary(frame)? else {
        return Ok(None);
    };

    let crop = square_face_box(face.bbox, frame.cols(), frame.rows(), FACE_BOX_EXPANSION);
    mesh_detector.detect(frame, crop).map(Some)
}
