//! Remote-control client implementation.
//!
//! This module provides the connection manager that handles:
//! - Dialing the rover's control endpoint
//! - Translating control input events into command frames
//! - Indefinite fixed-delay reconnection after every closure
//! - Projecting the link lifecycle into a display status

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use rovctl_core::{LinkEvent, LinkState, PressTracker, Status};
use rovctl_protocol::control_endpoint;

use crate::config::ClientConfig;

/// Control input events delivered to the client.
///
/// Touch start/end from a touch surface map to the same press start/end
/// events; pointer-leave is distinct because it only stops the rover when
/// it leaves the control currently held.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// A control was pressed.
    PressStart(String),
    /// A control was released.
    PressEnd(String),
    /// The pointer left a control while the button was still held.
    PointerLeave(String),
}

/// How a connected session ended.
enum SessionEnd {
    /// The remote closed the connection or the stream ended.
    RemoteClosed,
    /// A transport error occurred.
    TransportError,
    /// Every input sender was dropped; the client should shut down.
    InputClosed,
}

/// What the session select loop observed on one iteration.
enum Step {
    Inbound(Message),
    InboundError(tokio_tungstenite::tungstenite::Error),
    StreamEnd,
    Input(ControlEvent),
    InputClosed,
}

/// The rover remote-control client.
///
/// Owns the one logical connection and the one active-button tracker.
/// Lifecycle is explicit: [`RemoteClient::new`], hand out senders and
/// status receivers, then [`RemoteClient::run`] until every input sender
/// is dropped.
pub struct RemoteClient {
    config: ClientConfig,
    tracker: PressTracker,
    link: LinkState,
    input_tx: mpsc::Sender<ControlEvent>,
    input_rx: mpsc::Receiver<ControlEvent>,
    status_tx: broadcast::Sender<Status>,
}

impl RemoteClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let (input_tx, input_rx) = mpsc::channel(64);
        let (status_tx, _) = broadcast::channel(16);

        Self {
            config,
            tracker: PressTracker::new(),
            link: LinkState::Connecting,
            input_tx,
            input_rx,
            status_tx,
        }
    }

    /// Apply a link event and log the transition.
    fn link_event(&mut self, event: LinkEvent) {
        let next = self.link.on(event);
        if next != self.link {
            debug!("Link {} -> {}", self.link, next);
            self.link = next;
        }
    }

    /// Get a sender for submitting control events to the client.
    pub fn input_sender(&self) -> mpsc::Sender<ControlEvent> {
        self.input_tx.clone()
    }

    /// Get a receiver observing display status transitions.
    ///
    /// Every transition is delivered, including the transient
    /// `ConnectionError` between a transport error and the `Disconnected`
    /// that follows it.
    pub fn status_receiver(&self) -> broadcast::Receiver<Status> {
        self.status_tx.subscribe()
    }

    /// Run the client until every input sender has been dropped.
    ///
    /// The connect → session → reconnect cycle repeats indefinitely: there
    /// is no backoff growth and no retry cap. A transport error is a
    /// transient status signal, never a terminal failure.
    pub async fn run(mut self) {
        // The sender kept in the struct would keep the input channel open
        // forever; drop it so shutdown follows the last external sender.
        // Callers must obtain senders via `input_sender` before `run`.
        drop(std::mem::replace(&mut self.input_tx, mpsc::channel(1).0));

        let url = control_endpoint(&self.config.host);

        loop {
            let _ = self.status_tx.send(Status::Connecting);
            debug!("Connecting to {}", url);

            match self.dial(&url).await {
                None => {
                    info!("All control inputs dropped, shutting down");
                    return;
                }
                Some(Ok(ws)) => {
                    info!("Control link open to {}", url);
                    self.link_event(LinkEvent::Opened);
                    let _ = self.status_tx.send(Status::Connected);

                    match self.session(ws).await {
                        SessionEnd::InputClosed => {
                            info!("All control inputs dropped, shutting down");
                            return;
                        }
                        SessionEnd::TransportError => {
                            self.link_event(LinkEvent::TransportError);
                            let _ = self.status_tx.send(Status::ConnectionError);
                            let _ = self.status_tx.send(Status::Disconnected);
                        }
                        SessionEnd::RemoteClosed => {
                            info!("Control link closed by rover");
                            self.link_event(LinkEvent::RemoteClosed);
                            let _ = self.status_tx.send(Status::Disconnected);
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("Connection to {} failed: {}", url, e);
                    self.link_event(LinkEvent::TransportError);
                    let _ = self.status_tx.send(Status::ConnectionError);
                    let _ = self.status_tx.send(Status::Disconnected);
                }
            }

            debug!("Reconnecting in {} ms", self.config.reconnect_delay_ms);
            if !self.wait_retry().await {
                info!("All control inputs dropped, shutting down");
                return;
            }
            self.link_event(LinkEvent::RetryElapsed);
        }
    }

    /// Dial the control endpoint. Control events arriving while the dial
    /// is in flight still update the press tracker, but their command
    /// codes are dropped - a press made before the link opened must never
    /// replay onto the new connection.
    ///
    /// Returns `None` when every input sender has been dropped.
    async fn dial(
        &mut self,
        url: &str,
    ) -> Option<
        Result<
            WebSocketStream<MaybeTlsStream<TcpStream>>,
            tokio_tungstenite::tungstenite::Error,
        >,
    > {
        let connect = connect_async(url);
        tokio::pin!(connect);

        loop {
            let event = tokio::select! {
                result = &mut connect => return Some(result.map(|(ws, _)| ws)),
                event = self.input_rx.recv() => event,
            };
            match event {
                Some(event) => {
                    if let Some(code) = apply_event(&mut self.tracker, event) {
                        trace!("Link not open, command code '{}' dropped", code);
                    }
                }
                None => return None,
            }
        }
    }

    /// Drive one connected session. Events are serialized through a single
    /// select loop; each handler runs to completion before the next event
    /// is taken.
    async fn session(&mut self, ws: WebSocketStream<MaybeTlsStream<TcpStream>>) -> SessionEnd {
        debug_assert!(self.link.is_open());
        let (mut ws_tx, mut ws_rx) = ws.split();

        loop {
            let step = tokio::select! {
                msg = ws_rx.next() => match msg {
                    Some(Ok(msg)) => Step::Inbound(msg),
                    Some(Err(e)) => Step::InboundError(e),
                    None => Step::StreamEnd,
                },
                event = self.input_rx.recv() => match event {
                    Some(event) => Step::Input(event),
                    None => Step::InputClosed,
                },
            };

            match step {
                Step::Inbound(Message::Text(text)) => {
                    // Inbound frames are diagnostic only; nothing reacts
                    // to them.
                    debug!("Rover response: {}", text);
                }
                Step::Inbound(Message::Ping(data)) => {
                    if let Err(e) = ws_tx.send(Message::Pong(data)).await {
                        error!("Failed to answer ping: {}", e);
                        return SessionEnd::TransportError;
                    }
                }
                Step::Inbound(Message::Close(_)) => return SessionEnd::RemoteClosed,
                Step::Inbound(_) => {}
                Step::InboundError(e) => {
                    error!("WebSocket error: {}", e);
                    return SessionEnd::TransportError;
                }
                Step::StreamEnd => return SessionEnd::RemoteClosed,
                Step::Input(event) => {
                    if let Some(code) = apply_event(&mut self.tracker, event) {
                        trace!("Sending command code '{}'", code);
                        if let Err(e) = ws_tx.send(Message::Text(code.to_string())).await {
                            error!("Failed to send command: {}", e);
                            return SessionEnd::TransportError;
                        }
                    }
                }
                Step::InputClosed => return SessionEnd::InputClosed,
            }
        }
    }

    /// Wait out the reconnect delay. Control events arriving while the
    /// link is down still update the press tracker, but their command
    /// codes are dropped silently - no queueing, no surfaced error.
    ///
    /// Returns `false` when every input sender has been dropped.
    async fn wait_retry(&mut self) -> bool {
        let delay = tokio::time::sleep(self.config.reconnect_delay());
        tokio::pin!(delay);

        loop {
            let event = tokio::select! {
                _ = &mut delay => return true,
                event = self.input_rx.recv() => event,
            };
            match event {
                Some(event) => {
                    if let Some(code) = apply_event(&mut self.tracker, event) {
                        trace!("Link not open, command code '{}' dropped", code);
                    }
                }
                None => return false,
            }
        }
    }
}

/// Fold a control event through the press tracker, yielding the command
/// code to transmit, if any.
fn apply_event(tracker: &mut PressTracker, event: ControlEvent) -> Option<char> {
    match event {
        ControlEvent::PressStart(control) => Some(tracker.press_start(&control)),
        ControlEvent::PressEnd(_) => Some(tracker.press_end()),
        ControlEvent::PointerLeave(control) => tracker.pointer_leave(&control),
    }
}
