//! # rovctl-protocol
//!
//! Rover control wire format and endpoint conventions.
//!
//! Commands travel as WebSocket text frames carrying exactly one ASCII
//! character; the control endpoint lives at a fixed path on the rover.

pub mod codec;
pub mod endpoint;

pub use codec::{decode_command, encode_command, CodecError};
pub use endpoint::{control_endpoint, WS_PATH};
