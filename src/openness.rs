//! Eye openness estimation.
//!
//! Computes the eye aspect ratio (EAR) from a 16-point eye contour: the mean
//! of six vertical lid distances divided by the corner-to-corner width. The
//! ratio is dimensionless and scale invariant to first order, so it survives
//! the face moving toward or away from the camera. It is not roll or
//! perspective invariant; large head tilt distorts it.

use crate::constants::EYE_CONTOUR_POINTS;

/// Vertical lid pairs of the canonical 16-point contour. Point k opposes
/// point (16 - k); the corner points 0 and 8 span the horizontal axis.
const VERTICAL_PAIRS: [(usize, usize); 6] = [(1, 15), (2, 14), (3, 13), (4, 12), (5, 11), (6, 10)];

/// Indices of the two horizontal corner points
const CORNERS: (usize, usize) = (0, 8);

fn distance(a: (f32, f32), b: (f32, f32)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    dx.hypot(dy)
}

/// Openness ratio for one eye; smaller means more closed.
///
/// A degenerate contour with zero corner-to-corner width yields
/// `f64::INFINITY`, which reads as "fully open" and can never trigger a
/// blink classification.
#[must_use]
pub fn eye_aspect_ratio(contour: &[(f32, f32); EYE_CONTOUR_POINTS]) -> f64 {
    let horizontal = distance(contour[CORNERS.0], contour[CORNERS.1]);
    if horizontal == 0.0 {
        return f64::INFINITY;
    }

    let vertical_sum: f64 = VERTICAL_PAIRS
        .iter()
        .map(|&(top, bottom)| distance(contour[top], contour[bottom]))
        .sum();

    vertical_sum / (VERTICAL_PAIRS.len() as f64) / horizontal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Contour with corners 10 apart and every lid pair 4 apart vertically
    fn open_eye() -> [(f32, f32); EYE_CONTOUR_POINTS] {
        let mut contour = [(0.0f32, 0.0f32); EYE_CONTOUR_POINTS];
        contour[0] = (0.0, 0.0);
        contour[8] = (10.0, 0.0);
        for (k, &(top, bottom)) in VERTICAL_PAIRS.iter().enumerate() {
            let x = 2.0 + k as f32;
            contour[top] = (x, 2.0);
            contour[bottom] = (x, -2.0);
        }
        // 7 and 9 are part of the traversal but not sampled by the formula
        contour[7] = (9.0, -0.5);
        contour[9] = (9.0, 0.5);
        contour
    }

    #[test]
    fn open_eye_ratio() {
        // six pairs of height 4 over width 10
        let ratio = eye_aspect_ratio(&open_eye());
        assert!((ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn closed_eye_is_near_zero() {
        let mut contour = open_eye();
        for &(top, bottom) in &VERTICAL_PAIRS {
            contour[top].1 = 0.0;
            contour[bottom].1 = 0.0;
        }
        assert_eq!(eye_aspect_ratio(&contour), 0.0);
    }

    #[test]
    fn degenerate_width_reads_as_fully_open() {
        let contour = [(5.0f32, 5.0f32); EYE_CONTOUR_POINTS];
        assert_eq!(eye_aspect_ratio(&contour), f64::INFINITY);
    }

    proptest! {
        #[test]
        fn ratio_is_finite_and_non_negative(
            offsets in proptest::collection::vec(-50.0f32..50.0, EYE_CONTOUR_POINTS)
        ) {
            let mut contour = open_eye();
            for (point, jitter) in contour.iter_mut().zip(offsets) {
                point.1 += jitter;
            }
            let ratio = eye_aspect_ratio(&contour);
            prop_assert!(ratio.is_finite());
            prop_assert!(ratio >= 0.0);
        }

        #[test]
        fn ratio_is_scale_invariant(scale in 0.01f32..100.0) {
            let base = open_eye();
            let mut scaled = base;
            for point in &mut scaled {
                point.0 *= scale;
                point.1 *= scale;
            }
            let a = eye_aspect_ratio(&base);
            let b = eye_aspect_ratio(&scaled);
            prop_assert!((a - b).abs() < 1e-4);
        }
    }
}
