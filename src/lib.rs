//! Hands-free pointer control from facial landmarks.
//!
//! This library turns a real-time stream of face landmarks into mouse
//! control: head position relative to a one-time calibrated baseline drives
//! cursor displacement, and per-eye closures fire debounced click events.
//! The pipeline is:
//!
//! 1. Face detection to locate the primary face in the frame
//! 2. Face mesh landmark detection (MediaPipe 468-point topology)
//! 3. Eye aspect ratio (EAR) estimation per eye
//! 4. Displacement mapping from the calibrated nose baseline to the cursor
//! 5. Gesture classification with independent per-class cooldowns
//!
//! Detection runs on ONNX Runtime, capture and preview on `OpenCV`, and
//! pointer injection on X11 via x11rb.
//!
//! # Examples
//!
//! ## Core signal path, no devices
//!
//! ```
//! use face_mouse::calibration::CalibrationBaseline;
//! use face_mouse::gesture::GestureClassifier;
//! use face_mouse::mapper::CursorMapper;
//! use std::time::{Duration, Instant};
//!
//! // Baseline captured at calibration time
//! let baseline = CalibrationBaseline { x: 320.0, y: 240.0 };
//! let mapper = CursorMapper::new(baseline, 2.5, 1920, 1080);
//!
//! // Head 10 px right of neutral nudges the cursor 25 px right
//! let next = mapper.target((330.0, 240.0), (500, 300));
//! assert_eq!(next, (525, 300));
//!
//! // Left eye closed, right open fires a left click, then debounces
//! let mut classifier = GestureClassifier::new(0.45, Duration::from_secs(1));
//! let now = Instant::now();
//! assert_eq!(classifier.classify(0.2, 0.6, now).len(), 1);
//! assert!(classifier.classify(0.2, 0.6, now + Duration::from_millis(100)).is_empty());
//! ```
//!
//! ## Full application
//!
//! ```no_run
//! use face_mouse::app::{FaceMouseApp, VideoSource};
//! use face_mouse::config::Config;
//!
//! # fn main() -> face_mouse::Result<()> {
//! let mut app = FaceMouseApp::new(Config::default(), VideoSource::Camera(0))?;
//! app.calibrate()?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Face detection module for locating the primary face
pub mod face_detection;

/// Face mesh landmark detection module (468-point topology)
pub mod mesh_detection;

/// Landmark frame adapter and anatomical index tables
pub mod landmarks;

/// Eye openness (aspect ratio) estimation
pub mod openness;

/// One-time baseline calibration
pub mod calibration;

/// Head-displacement to cursor mapping
pub mod mapper;

/// Gesture classification and debouncing
pub mod gesture;

/// Pointer injection for X11 systems
pub mod cursor_control;

/// Utility functions for boxes and coordinate casts
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
