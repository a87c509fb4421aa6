//! Landmark frame adapter.
//!
//! Normalizes the raw per-frame landmark output of the face mesh detector
//! into a fixed-size, positionally indexed point set and exposes the named
//! anatomical subsets the rest of the pipeline consumes. Index stability
//! across frames (same anatomical point = same index) is a contract of the
//! detector; this module validates counts at the boundary so the openness
//! math never sees a mis-sized subset.

use crate::{
    constants::{
        EYE_CONTOUR_POINTS, LEFT_EYE_INDICES, NOSE_TIP_INDEX, NUM_MESH_LANDMARKS, RIGHT_EYE_INDICES,
    },
    Error, Result,
};

/// Which eye a contour subset belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Mesh index table for this eye's contour, in canonical order
    #[must_use]
    pub const fn contour_indices(self) -> &'static [usize; EYE_CONTOUR_POINTS] {
        match self {
            Self::Left => &LEFT_EYE_INDICES,
            Self::Right => &RIGHT_EYE_INDICES,
        }
    }
}

/// One frame's worth of face landmarks in image pixel coordinates.
///
/// Produced fresh each frame and discarded after use; never persisted.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    points: Vec<(f32, f32)>,
}

impl LandmarkSet {
    /// Wrap a raw detector output, validating the expected landmark count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Landmark`] if the point count differs from the
    /// face mesh contract.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self> {
        if points.len() != NUM_MESH_LANDMARKS {
            return Err(Error::Landmark(format!(
                "expected {} landmarks, detector produced {}",
                NUM_MESH_LANDMARKS,
                points.len()
            )));
        }
        Ok(Self { points })
    }

    /// All landmark points, positionally indexed
    #[must_use]
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// The 16-point contour of one eye in canonical corner/lid order.
    ///
    /// Position 0 and 8 are the horizontal corners; point k pairs
    /// vertically with point (16 - k) for k = 1..=6.
    #[must_use]
    pub fn eye_contour(&self, eye: Eye) -> [(f32, f32); EYE_CONTOUR_POINTS] {
        let mut contour = [(0.0f32, 0.0f32); EYE_CONTOUR_POINTS];
        for (slot, &idx) in contour.iter_mut().zip(eye.contour_indices().iter()) {
            *slot = self.points[idx];
        }
        contour
    }

    /// The nose-tip reference point used for cursor displacement
    #[must_use]
    pub fn nose_tip(&self) -> (f32, f32) {
        self.points[NOSE_TIP_INDEX]
    }
}
