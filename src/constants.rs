//! Constants used throughout the application

/// Number of landmarks produced by the face mesh model
pub const NUM_MESH_LANDMARKS: usize = 468;

/// Number of contour points describing one eye
pub const EYE_CONTOUR_POINTS: usize = 16;

/// Left-eye contour indices into the face mesh, in canonical order:
/// position 0 and 8 are the horizontal corners, 1-7 / 9-15 are the
/// paired top/bottom lid points.
pub const LEFT_EYE_INDICES: [usize; EYE_CONTOUR_POINTS] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

/// Right-eye contour indices, same canonical order as the left eye.
pub const RIGHT_EYE_INDICES: [usize; EYE_CONTOUR_POINTS] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

/// Mesh index of the nose tip, the head-reference landmark
pub const NOSE_TIP_INDEX: usize = 4;

/// Openness ratio below which an eye counts as closed
pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.45;

/// Minimum interval between two firings of the same gesture class
pub const DEFAULT_GESTURE_COOLDOWN_SECS: f64 = 1.0;

/// Multiplier applied to nose displacement before it moves the cursor
pub const DEFAULT_CURSOR_GAIN: f64 = 2.5;

/// Smoothing duration for a single cursor move
pub const DEFAULT_MOVE_DURATION_SECS: f64 = 0.1;

/// Delay between calibration samples when no face is found
pub const DEFAULT_CALIBRATION_RETRY_SECS: f64 = 1.0;

/// Image normalization constants for the ONNX detectors
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 128.0;
