//! Status projection for display.
//!
//! A pure projection of the link lifecycle into a text label and a
//! background color. No independent logic, no history.

/// The visible connection status.
///
/// `ConnectionError` is a transient signal: a close always follows a
/// transport error, replacing it with `Disconnected` before the next
/// reconnect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// A connection attempt is in flight.
    #[default]
    Connecting,
    /// The link is open.
    Connected,
    /// A transport error occurred.
    ConnectionError,
    /// The link closed; a reconnect is pending.
    Disconnected,
}

impl Status {
    /// Text label for the status display.
    pub fn label(self) -> &'static str {
        match self {
            Status::Connecting => "Connecting...",
            Status::Connected => "Connected",
            Status::ConnectionError => "Connection error",
            Status::Disconnected => "Disconnected",
        }
    }

    /// Background color for the status display.
    pub fn color(self) -> &'static str {
        match self {
            // Affirmative green for connected (and for the initial
            // connecting state, matching the served page).
            Status::Connecting | Status::Connected => "#2ecc71",
            Status::ConnectionError => "#e74c3c",
            Status::Disconnected => "#f39c12",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
