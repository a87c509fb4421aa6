//! One-time baseline calibration.
//!
//! Captures the neutral nose-tip position that all later cursor displacement
//! is measured against. Calibration is two-phase: first an explicit ready
//! signal from the user (so the first sampled frame really is a neutral
//! pose, not mid-motion), then sampling until the detector reports a face.
//! There is no numeric fallback; a camera that never finds a face surfaces
//! as an error or keeps retrying, never as a fabricated baseline.

use std::io::{BufRead, Write};
use std::time::Duration;

use log::{info, warn};

use crate::{constants::DEFAULT_CALIBRATION_RETRY_SECS, Error, Result};

/// Neutral head-reference position, immutable for the rest of the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationBaseline {
    pub x: f32,
    pub y: f32,
}

/// Baseline calibrator with a fixed retry delay and optional retry cap
#[derive(Debug)]
pub struct Calibrator {
    retry_delay: Duration,
    max_retries: Option<u32>,
}

impl Calibrator {
    /// Create a calibrator. `max_retries: None` retries indefinitely until
    /// a face is found or the sampler returns an error.
    #[must_use]
    pub fn new(retry_delay: Duration, max_retries: Option<u32>) -> Self {
        Self {
            retry_delay,
            max_retries,
        }
    }

    /// Prompt on `output` and block until the user confirms on `input`.
    ///
    /// Generic over the reader/writer so the synchronization step carries no
    /// dependency on a particular console.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be written or the confirmation
    /// line cannot be read.
    pub fn await_ready_signal<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
        write!(
            output,
            "Look at the center of the screen and press Enter to calibrate..."
        )?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(())
    }

    /// Sample until the detector reports a face, returning that frame's
    /// reference point as the baseline.
    ///
    /// `sample` returns `Ok(None)` for a no-face frame; the calibrator then
    /// waits for the retry delay instead of busy-spinning.
    ///
    /// # Errors
    ///
    /// Propagates sampler errors, and returns [`Error::Calibration`] if a
    /// retry cap was set and exhausted.
    pub fn sample_until_face_found<F>(&self, mut sample: F) -> Result<CalibrationBaseline>
    where
        F: FnMut() -> Result<Option<(f32, f32)>>,
    {
        let mut attempts = 0u32;
        loop {
            if let Some((x, y)) = sample()? {
                info!("Calibration successful, baseline at ({x:.1}, {y:.1})");
                return Ok(CalibrationBaseline { x, y });
            }

            attempts += 1;
            if let Some(max) = self.max_retries {
                if attempts >= max {
                    return Err(Error::Calibration(format!(
                        "no face found after {max} attempts"
                    )));
                }
            }

            warn!("Face not detected, retrying calibration...");
            std::thread::sleep(self.retry_delay);
        }
    }
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(
            Duration::from_secs_f64(DEFAULT_CALIBRATION_RETRY_SECS),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_calibrator(max_retries: Option<u32>) -> Calibrator {
        Calibrator::new(Duration::from_millis(1), max_retries)
    }

    #[test]
    fn returns_first_face_position() {
        let calibrator = fast_calibrator(None);
        let baseline = calibrator
            .sample_until_face_found(|| Ok(Some((320.0, 240.0))))
            .unwrap();
        assert_eq!(baseline, CalibrationBaseline { x: 320.0, y: 240.0 });
    }

    #[test]
    fn retries_until_face_appears() {
        let calibrator = fast_calibrator(None);
        let mut frames = vec![None, None, None, Some((100.0, 150.0))].into_iter();
        let mut calls = 0;
        let baseline = calibrator
            .sample_until_face_found(|| {
                calls += 1;
                Ok(frames.next().flatten())
            })
            .unwrap();
        assert_eq!(baseline, CalibrationBaseline { x: 100.0, y: 150.0 });
        assert_eq!(calls, 4);
    }

    #[test]
    fn capped_retries_fail_cleanly() {
        let calibrator = fast_calibrator(Some(3));
        let result = calibrator.sample_until_face_found(|| Ok(None));
        assert!(matches!(result, Err(Error::Calibration(_))));
    }

    #[test]
    fn sampler_errors_propagate() {
        let calibrator = fast_calibrator(None);
        let result = calibrator
            .sample_until_face_found(|| Err(Error::InvalidInput("camera gone".to_string())));
        assert!(result.is_err());
    }

    #[test]
    fn ready_signal_prompts_and_waits_for_enter() {
        let mut input = std::io::Cursor::new(b"\n".to_vec());
        let mut output = Vec::new();
        Calibrator::await_ready_signal(&mut input, &mut output).unwrap();
        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.contains("press Enter"));
    }
}
