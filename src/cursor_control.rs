//! Pointer injection for X11-based systems.
//!
//! [`PointerSink`] is the boundary the frame loop talks to: fire-and-forget
//! moves and clicks. [`CursorController`] implements it over x11rb, warping
//! the pointer through the X server and synthesizing button events via the
//! XTEST extension. Moves carry an optional smoothing duration, executed as
//! stepped interpolation between the current and target positions.

use std::time::Duration;

use log::{debug, info};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{ConnectionExt, Screen, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT},
        xtest::ConnectionExt as XTestConnectionExt,
    },
    rust_connection::RustConnection,
};

use crate::error::{Error, Result};

/// Interpolation step length for smoothed moves
const MOVE_STEP: Duration = Duration::from_millis(16);

/// Mouse button for single-click injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    const fn detail(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 3,
        }
    }
}

/// Input-injection boundary consumed by the frame loop.
///
/// All operations are fire-and-forget; the core never consumes a return
/// value beyond error propagation.
pub trait PointerSink {
    /// Current pointer position in screen pixels
    fn position(&self) -> Result<(i16, i16)>;

    /// Move the pointer to an absolute position, optionally smoothed over
    /// `duration`
    fn move_to(&self, x: i16, y: i16, duration: Duration) -> Result<()>;

    /// Press and release one button
    fn click(&self, button: MouseButton) -> Result<()>;

    /// Two rapid left clicks
    fn double_click(&self) -> Result<()>;

    /// Screen dimensions in pixels
    fn screen_size(&self) -> (u16, u16);
}

/// Pointer injection over an X11 connection
pub struct CursorController {
    connection: RustConnection,
    screen: Screen,
    screen_width: u16,
    screen_height: u16,
}

impl CursorController {
    /// Connect to the X server and capture screen geometry
    pub fn new() -> Result<Self> {
        info!("Initializing X11 cursor controller");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::CursorControl(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::CursorControl("Failed to get screen".to_string()))?
            .clone();

        let screen_width = screen.width_in_pixels;
        let screen_height = screen.height_in_pixels;

        info!("Connected to X11 display, screen: {screen_width}x{screen_height}");

        Ok(Self {
            connection,
            screen,
            screen_width,
            screen_height,
        })
    }

    fn warp(&self, x: i16, y: i16) -> Result<()> {
        let max_x = i16::try_from(self.screen_width.saturating_sub(1)).unwrap_or(i16::MAX);
        let max_y = i16::try_from(self.screen_height.saturating_sub(1)).unwrap_or(i16::MAX);
        let x = x.clamp(0, max_x);
        let y = y.clamp(0, max_y);

        self.connection
            .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::CursorControl(format!("Failed to warp pointer: {e}")))?;
        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }

    fn button_event(&self, event_type: u8, detail: u8) -> Result<()> {
        self.connection
            .xtest_fake_input(
                event_type,
                detail,
                x11rb::CURRENT_TIME,
                self.screen.root,
                0,
                0,
                0,
            )
            .map_err(|e| Error::CursorControl(format!("Failed to inject button event: {e}")))?;
        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;
        Ok(())
    }

    fn press_and_release(&self, detail: u8) -> Result<()> {
        self.button_event(BUTTON_PRESS_EVENT, detail)?;
        self.button_event(BUTTON_RELEASE_EVENT, detail)
    }
}

impl PointerSink for CursorController {
    fn position(&self) -> Result<(i16, i16)> {
        let reply = self
            .connection
            .query_pointer(self.screen.root)
            .map_err(|e| Error::CursorControl(format!("Failed to send query pointer: {e}")))?
            .reply()
            .map_err(|e| Error::CursorControl(format!("Failed to query pointer: {e}")))?;

        Ok((reply.root_x, reply.root_y))
    }

    fn move_to(&self, x: i16, y: i16, duration: Duration) -> Result<()> {
        debug!("Moving cursor to ({x}, {y}) over {duration:?}");

        let steps = (duration.as_secs_f64() / MOVE_STEP.as_secs_f64()).floor() as i32;
        if steps <= 1 {
            return self.warp(x, y);
        }

        let (start_x, start_y) = self.position()?;
        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let ix = f64::from(start_x) + (f64::from(x) - f64::from(start_x)) * t;
            let iy = f64::from(start_y) + (f64::from(y) - f64::from(start_y)) * t;
            #[allow(clippy::cast_possible_truncation)] // interpolants lie between i16 endpoints
            self.warp(ix.round() as i16, iy.round() as i16)?;
            std::thread::sleep(MOVE_STEP);
        }
        Ok(())
    }

    fn click(&self, button: MouseButton) -> Result<()> {
        debug!("Injecting {button:?} click");
        self.press_and_release(button.detail())
    }

    fn double_click(&self) -> Result<()> {
        debug!("Injecting double click");
        self.press_and_release(MouseButton::Left.detail())?;
        self.press_and_release(MouseButton::Left.detail())
    }

    fn screen_size(&self) -> (u16, u16) {
        (self.screen_width, self.screen_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_details_match_x11_core() {
        assert_eq!(MouseButton::Left.detail(), 1);
        assert_eq!(MouseButton::Right.detail(), 3);
    }

    #[test]
    #[ignore] // Requires X11 display
    fn cursor_controller_creation() {
        let controller = CursorController::new();
        assert!(controller.is_ok() || controller.is_err()); // Will fail without X11
    }
}
