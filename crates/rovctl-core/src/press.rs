//! Press tracking for the directional controls.
//!
//! At most one control is considered "held down" at any instant. The tracker
//! decides which command code a press, release, or pointer-leave should
//! produce, and guards against spurious stops when the pointer leaves a
//! control that was never pressed.

use crate::command::{command_code, STOP_CODE};

/// Tracks the currently held control, if any.
///
/// Every press of a directional control is eventually answered with a stop
/// code: either through [`PressTracker::press_end`] or through
/// [`PressTracker::pointer_leave`] on the held control.
#[derive(Debug, Default)]
pub struct PressTracker {
    active: Option<String>,
}

impl PressTracker {
    /// Create a tracker with no control held.
    pub fn new() -> Self {
        Self::default()
    }

    /// The control currently held down, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// A control was pressed. Returns the command code to transmit.
    ///
    /// Unknown controls map to the stop code. Pressing the stop control
    /// leaves no active button behind.
    pub fn press_start(&mut self, control: &str) -> char {
        let code = command_code(control);
        if code == STOP_CODE {
            self.active = None;
        } else {
            self.active = Some(control.to_string());
        }
        code
    }

    /// The held control was released. Returns the stop code.
    pub fn press_end(&mut self) -> char {
        self.active = None;
        STOP_CODE
    }

    /// The pointer left a control.
    ///
    /// Only meaningful when the control being left is the one currently
    /// held; leaving any other control is a no-op and returns `None`.
    pub fn pointer_leave(&mut self, control: &str) -> Option<char> {
        if self.active.as_deref() == Some(control) {
            self.active = None;
            Some(STOP_CODE)
        } else {
            None
        }
    }
}
