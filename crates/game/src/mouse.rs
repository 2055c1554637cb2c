//! Mouse capture state.
//!
//! Gameplay input only counts while the mouse is captured. Escape releases
//! the mouse, a second press captures it again.

use serde::{Deserialize, Serialize};

/// Whether the mouse is captured by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseCapture {
    captured: bool,
    escape_previous: bool,
}

impl Default for MouseCapture {
    fn default() -> Self {
        Self {
            captured: true,
            escape_previous: false,
        }
    }
}

impl MouseCapture {
    /// Check if the mouse is captured.
    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Capture the mouse (hide the cursor).
    pub fn capture(&mut self) {
        self.captured = true;
    }

    /// Release the mouse (show the cursor).
    pub fn release(&mut self) {
        self.captured = false;
    }

    /// Feed the escape key state for this frame.
    ///
    /// Returns `true` if the capture state changed.
    pub fn update(&mut self, escape_down: bool) -> bool {
        let pressed = escape_down && !self.escape_previous;
        self.escape_previous = escape_down;

        if pressed {
            self.captured = !self.captured;
            log::debug!("Mouse {}", if self.captured { "captured" } else { "released" });
        }
        pressed
    }
}
