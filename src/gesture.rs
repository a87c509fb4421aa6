//! Gesture classification and debouncing.
//!
//! Turns the two per-frame openness ratios into discrete click events.
//! Classification itself is stateless; the only memory is one last-fired
//! timestamp per gesture class, owned by the classifier instance so
//! independent sessions (and tests) never share timers.

use std::time::{Duration, Instant};

use crate::constants::{DEFAULT_BLINK_THRESHOLD, DEFAULT_GESTURE_COOLDOWN_SECS};

/// Discrete pointer action derived from eye closures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Left eye closed, right eye open
    LeftClick,
    /// Right eye closed, left eye open
    RightClick,
    /// Both eyes closed
    DoubleClick,
}

/// Per-session gesture classifier with one cooldown timer per class.
///
/// The three rules are evaluated independently every frame rather than as an
/// exhaustive match. The single-eye rules require the other eye to be open,
/// so a both-eyes-closed frame can only ever satisfy the double-click rule.
/// Each cooldown is independent: a double-click does not delay a left-click
/// whose own timer has already elapsed.
#[derive(Debug)]
pub struct GestureClassifier {
    threshold: f64,
    cooldown: Duration,
    last_left_click: Option<Instant>,
    last_right_click: Option<Instant>,
    last_double_click: Option<Instant>,
}

impl GestureClassifier {
    /// Create a classifier with an openness threshold and per-class cooldown
    #[must_use]
    pub fn new(threshold: f64, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            last_left_click: None,
            last_right_click: None,
            last_double_click: None,
        }
    }

    /// Classify one frame's openness ratios at timestamp `now`.
    ///
    /// Returns every gesture that fired this frame; firing updates that
    /// gesture's own timer only.
    pub fn classify(&mut self, left: f64, right: f64, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if left < self.threshold
            && right >= self.threshold
            && Self::cooled_down(self.last_left_click, now, self.cooldown)
        {
            self.last_left_click = Some(now);
            events.push(GestureEvent::LeftClick);
        }

        if right < self.threshold
            && left >= self.threshold
            && Self::cooled_down(self.last_right_click, now, self.cooldown)
        {
            self.last_right_click = Some(now);
            events.push(GestureEvent::RightClick);
        }

        if left < self.threshold
            && right < self.threshold
            && Self::cooled_down(self.last_double_click, now, self.cooldown)
        {
            self.last_double_click = Some(now);
            events.push(GestureEvent::DoubleClick);
        }

        events
    }

    fn cooled_down(last: Option<Instant>, now: Instant, cooldown: Duration) -> bool {
        match last {
            Some(fired) => now.duration_since(fired) > cooldown,
            None => true,
        }
    }

    /// Clear all cooldown timers
    pub fn reset(&mut self) {
        self.last_left_click = None;
        self.last_right_click = None;
        self.last_double_click = None;
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_BLINK_THRESHOLD,
            Duration::from_secs_f64(DEFAULT_GESTURE_COOLDOWN_SECS),
        )
    }
}
