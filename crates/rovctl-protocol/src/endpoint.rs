//! Control endpoint location.

/// Fixed WebSocket path for the control endpoint on the rover.
pub const WS_PATH: &str = "/ws";

/// Build the control endpoint URL for the given host.
///
/// The host comes from configuration (the native analogue of the page's
/// current location); the path is fixed.
pub fn control_endpoint(host: &str) -> String {
    format!("ws://{}{}", host, WS_PATH)
}
