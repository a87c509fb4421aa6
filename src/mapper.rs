//! Head-displacement to cursor mapping.
//!
//! Maps the nose tip's offset from the calibration baseline to an
//! incremental cursor move: the scaled offset is added to wherever the
//! cursor currently is, then clamped to the screen. Because the baseline
//! never updates and the raw offset is never consumed, holding the head
//! off-center keeps nudging the cursor in that direction every frame
//! rather than pinning it to a fixed position. That drift is the intended
//! control model, not an artifact.

use crate::{calibration::CalibrationBaseline, constants::DEFAULT_CURSOR_GAIN};

/// Cursor mapper owning the session baseline, gain and screen bounds
#[derive(Debug, Clone, Copy)]
pub struct CursorMapper {
    baseline: CalibrationBaseline,
    gain: f64,
    screen_width: u16,
    screen_height: u16,
}

impl CursorMapper {
    /// Create a mapper for one session
    #[must_use]
    pub fn new(baseline: CalibrationBaseline, gain: f64, screen_width: u16, screen_height: u16) -> Self {
        Self {
            baseline,
            gain,
            screen_width,
            screen_height,
        }
    }

    /// Mapper with the default sensitivity
    #[must_use]
    pub fn with_default_gain(baseline: CalibrationBaseline, screen_width: u16, screen_height: u16) -> Self {
        Self::new(baseline, DEFAULT_CURSOR_GAIN, screen_width, screen_height)
    }

    /// Next cursor position for the current nose-tip point, relative to
    /// where the cursor is right now, clamped to `[0, dimension - 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // clamped to i16-safe screen bounds
    pub fn target(&self, nose: (f32, f32), cursor: (i16, i16)) -> (i16, i16) {
        let dx = (f64::from(nose.0) - f64::from(self.baseline.x)) * self.gain;
        let dy = (f64::from(nose.1) - f64::from(self.baseline.y)) * self.gain;

        let max_x = f64::from(self.screen_width.saturating_sub(1));
        let max_y = f64::from(self.screen_height.saturating_sub(1));

        let x = (f64::from(cursor.0) + dx).clamp(0.0, max_x);
        let y = (f64::from(cursor.1) + dy).clamp(0.0, max_y);

        (x.round() as i16, y.round() as i16)
    }

    /// The session baseline this mapper measures displacement against
    #[must_use]
    pub const fn baseline(&self) -> CalibrationBaseline {
        self.baseline
    }
}
