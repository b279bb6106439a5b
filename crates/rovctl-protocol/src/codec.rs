//! Command frame codec.
//!
//! Each outbound frame is a text frame whose payload is a single ASCII
//! character from `{"0","1","2","4","8"}`. This module provides encoding
//! for the client and decoding for the firmware-facing side and test rigs.

use rovctl_core::Intent;
use thiserror::Error;

/// Errors that can occur while decoding a command frame.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame carried no payload.
    #[error("Empty command frame")]
    EmptyFrame,

    /// The frame carried more than the one expected character.
    #[error("Trailing data after command code ({0} extra bytes)")]
    TrailingData(usize),

    /// The code is not one of the five known command codes.
    #[error("Unknown command code '{0}'")]
    UnknownCode(char),

    /// Received binary frame instead of text.
    #[error("Expected text frame, received binary")]
    BinaryFrame,
}

/// Encode an intent as a one-character frame payload.
pub fn encode_command(intent: Intent) -> String {
    intent.code().to_string()
}

/// Decode a received frame payload into an intent.
pub fn decode_command(text: &str) -> Result<Intent, CodecError> {
    let mut chars = text.chars();
    let code = chars.next().ok_or(CodecError::EmptyFrame)?;
    let rest = chars.as_str();
    if !rest.is_empty() {
        return Err(CodecError::TrailingData(rest.len()));
    }
    match code {
        '1' => Ok(Intent::Forward),
        '2' => Ok(Intent::Backward),
        '4' => Ok(Intent::Left),
        '8' => Ok(Intent::Right),
        '0' => Ok(Intent::Stop),
        other => Err(CodecError::UnknownCode(other)),
    }
}
