//! Control intents and their wire command codes.
//!
//! Each of the five controls maps to a fixed single-character code. The
//! values are bitmask-flavored (`1/2/4/8`) but are only ever sent as
//! discrete codes, never combined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The stop code, also the fallback for any unknown control.
pub const STOP_CODE: char = '0';

/// A control identifier that names none of the five controls.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown control '{0}'")]
pub struct UnknownControl(pub String);

/// A discrete user intent from one of the five controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Drive forward.
    Forward,
    /// Drive backward.
    Backward,
    /// Turn left.
    Left,
    /// Turn right.
    Right,
    /// Stop all motion.
    Stop,
}

impl Intent {
    /// The single-character command code transmitted for this intent.
    pub fn code(self) -> char {
        match self {
            Intent::Forward => '1',
            Intent::Backward => '2',
            Intent::Left => '4',
            Intent::Right => '8',
            Intent::Stop => STOP_CODE,
        }
    }

    /// Look up an intent by control identifier.
    pub fn from_control(id: &str) -> Option<Intent> {
        match id {
            "forward" => Some(Intent::Forward),
            "backward" => Some(Intent::Backward),
            "left" => Some(Intent::Left),
            "right" => Some(Intent::Right),
            "stop" => Some(Intent::Stop),
            _ => None,
        }
    }

    /// The control identifier for this intent.
    pub fn control(self) -> &'static str {
        match self {
            Intent::Forward => "forward",
            Intent::Backward => "backward",
            Intent::Left => "left",
            Intent::Right => "right",
            Intent::Stop => "stop",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.control())
    }
}

impl std::str::FromStr for Intent {
    type Err = UnknownControl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::from_control(s).ok_or_else(|| UnknownControl(s.to_string()))
    }
}

/// Total mapping from control identifier to command code.
///
/// Unknown controls fall back to the stop code, so a malformed control id
/// can never keep the rover moving.
pub fn command_code(control: &str) -> char {
    Intent::from_control(control).map_or(STOP_CODE, Intent::code)
}
