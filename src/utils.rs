//! Utility functions for image processing and coordinate handling.

pub mod safe_cast;

use opencv::core::Rect;
use safe_cast::f32_to_i32_clamp;

/// Expand a detected face box by `shift` on each side, square it, and keep
/// it inside the image. The mesh model expects a square crop with some
/// margin around the face.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss acceptable for box dimensions
pub fn square_face_box(bbox: Rect, max_width: i32, max_height: i32, shift: f32) -> Rect {
    let mut bbox = bbox;

    let x_shift = f32_to_i32_clamp(bbox.width as f32 * shift, 0, max_width);
    let y_shift = f32_to_i32_clamp(bbox.height as f32 * shift, 0, max_height);

    bbox.x = (bbox.x - x_shift).max(0);
    bbox.y = (bbox.y - y_shift).max(0);
    bbox.width = (bbox.width + 2 * x_shift).min(max_width - bbox.x);
    bbox.height = (bbox.height + 2 * y_shift).min(max_height - bbox.y);

    let side_length = bbox.width.max(bbox.height);
    bbox.width = side_length;
    bbox.height = side_length;

    if bbox.x + bbox.width > max_width {
        bbox.x = max_width - bbox.width;
    }
    if bbox.y + bbox.height > max_height {
        bbox.y = max_height - bbox.height;
    }

    bbox
}
