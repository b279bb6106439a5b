//! Link state machine.

/// Lifecycle state of the control link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// A connection attempt is in flight.
    Connecting,
    /// The handshake completed; commands can be transmitted.
    Open,
    /// The link is down; a reconnect is pending.
    Closed,
}

/// Events that drive the link state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The handshake completed successfully.
    Opened,
    /// A transport-level error occurred.
    TransportError,
    /// The remote end closed the connection (or the stream ended).
    RemoteClosed,
    /// The reconnect delay elapsed.
    RetryElapsed,
}

impl LinkState {
    /// Apply an event, yielding the next state.
    ///
    /// There is no terminal state: a closed link always returns to
    /// connecting once the retry delay elapses. Event/state pairs not
    /// listed here are self-transitions.
    pub fn on(self, event: LinkEvent) -> LinkState {
        match (self, event) {
            (LinkState::Connecting, LinkEvent::Opened) => LinkState::Open,
            (LinkState::Connecting | LinkState::Open, LinkEvent::TransportError) => {
                LinkState::Closed
            }
            (LinkState::Connecting | LinkState::Open, LinkEvent::RemoteClosed) => LinkState::Closed,
            (LinkState::Closed, LinkEvent::RetryElapsed) => LinkState::Connecting,
            (state, _) => state,
        }
    }

    /// Whether commands may be transmitted right now.
    pub fn is_open(self) -> bool {
        self == LinkState::Open
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Connecting => write!(f, "connecting"),
            LinkState::Open => write!(f, "open"),
            LinkState::Closed => write!(f, "closed"),
        }
    }
}
