//! Integration tests for the rover remote-control client.
//!
//! These tests stand in for the rover firmware: a real WebSocket server on
//! an ephemeral port receives the command frames, so the full dial →
//! command → reconnect path is exercised end to end.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use rovctl_client::{ClientConfig, ControlEvent, RemoteClient, Status};
use rovctl_core::Intent;
use rovctl_protocol::decode_command;

/// What the fake rover observed.
#[derive(Debug, PartialEq)]
enum RoverEvent {
    /// A client completed the WebSocket handshake.
    Connected,
    /// A text frame arrived.
    Frame(String),
}

/// Start a fake rover. Accepts connections in sequence, reporting
/// handshakes and received frames. Sending on the returned kick channel
/// closes the current connection from the server side.
async fn start_rover() -> (
    SocketAddr,
    mpsc::Receiver<RoverEvent>,
    mpsc::Sender<()>,
    JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (event_tx, event_rx) = mpsc::channel(64);
    let (kick_tx, mut kick_rx) = mpsc::channel::<()>(4);

    let handle = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let ws = match tokio_tungstenite::accept_async(stream).await {
                Ok(ws) => ws,
                Err(_) => continue,
            };
            if event_tx.send(RoverEvent::Connected).await.is_err() {
                break;
            }

            let (mut ws_tx, mut ws_rx) = ws.split();
            loop {
                tokio::select! {
                    msg = ws_rx.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            if event_tx.send(RoverEvent::Frame(text)).await.is_err() {
                                return;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(_)) => break,
                        _ => {}
                    },
                    _ = kick_rx.recv() => {
                        let _ = ws_tx.close().await;
                        break;
                    }
                }
            }
        }
    });

    (addr, event_rx, kick_tx, handle)
}

/// Start a client pointed at the given address with a short reconnect
/// delay, returning its input sender, status receiver, and task handle.
fn start_client(
    addr: SocketAddr,
) -> (
    mpsc::Sender<ControlEvent>,
    broadcast::Receiver<Status>,
    JoinHandle<()>,
) {
    let config = ClientConfig {
        host: addr.to_string(),
        reconnect_delay_ms: 100,
    };
    let client = RemoteClient::new(config);
    let input_tx = client.input_sender();
    let status_rx = client.status_receiver();
    let handle = tokio::spawn(client.run());
    (input_tx, status_rx, handle)
}

/// Wait for the next rover event with a timeout.
async fn recv_event(rx: &mut mpsc::Receiver<RoverEvent>) -> RoverEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("Timed out waiting for rover event")
        .expect("Rover event channel closed")
}

/// Wait until the given status transition is observed.
async fn wait_for_status(rx: &mut broadcast::Receiver<Status>, want: Status) {
    loop {
        match timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Ok(status)) if status == want => return,
            Ok(Ok(_)) => {}
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => {}
            Ok(Err(broadcast::error::RecvError::Closed)) => {
                panic!("Status channel closed waiting for {:?}", want)
            }
            Err(_) => panic!("Timed out waiting for {:?} status", want),
        }
    }
}

#[tokio::test]
async fn test_press_forward_sends_code_then_stop() {
    let (addr, mut events, _kick, rover) = start_rover().await;
    let (input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    input
        .send(ControlEvent::PressStart("forward".into()))
        .await
        .unwrap();
    let RoverEvent::Frame(frame) = recv_event(&mut events).await else {
        panic!("Expected a command frame");
    };
    assert_eq!(frame, "1");
    assert_eq!(decode_command(&frame).unwrap(), Intent::Forward);

    input
        .send(ControlEvent::PressEnd("forward".into()))
        .await
        .unwrap();
    let RoverEvent::Frame(frame) = recv_event(&mut events).await else {
        panic!("Expected a command frame");
    };
    assert_eq!(frame, "0");
    assert_eq!(decode_command(&frame).unwrap(), Intent::Stop);

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_pointer_leave_while_held_stops() {
    let (addr, mut events, _kick, rover) = start_rover().await;
    let (input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    input
        .send(ControlEvent::PressStart("left".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("4".into()));

    // Dragging the pointer off the held control releases it.
    input
        .send(ControlEvent::PointerLeave("left".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("0".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_hover_without_press_sends_nothing() {
    let (addr, mut events, _kick, rover) = start_rover().await;
    let (input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    // Pointer enters and leaves a control that was never pressed.
    input
        .send(ControlEvent::PointerLeave("right".into()))
        .await
        .unwrap();

    // A subsequent press is the next frame observed - nothing arrived
    // in between.
    input
        .send(ControlEvent::PressStart("backward".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("2".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_unknown_control_sends_stop_code() {
    let (addr, mut events, _kick, rover) = start_rover().await;
    let (input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    input
        .send(ControlEvent::PressStart("warp-drive".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("0".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_status_reflects_connection_lifecycle() {
    let (addr, mut events, kick, rover) = start_rover().await;
    let (_input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);

    wait_for_status(&mut status, Status::Connected).await;

    // Server-side close moves the status to Disconnected before the
    // reconnect kicks in.
    kick.send(()).await.unwrap();
    wait_for_status(&mut status, Status::Disconnected).await;

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_dial_failure_publishes_connection_error() {
    // Reserve a port with no listener behind it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (_input, mut status, client) = start_client(addr);

    // The failed dial surfaces the transient error status before the
    // disconnected status that schedules the retry.
    wait_for_status(&mut status, Status::ConnectionError).await;
    wait_for_status(&mut status, Status::Disconnected).await;

    client.abort();
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let (addr, mut events, kick, rover) = start_rover().await;
    let (input, mut status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    // Drop the connection from the rover side.
    kick.send(()).await.unwrap();

    // The client comes back on its own after the fixed delay.
    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    // And commands flow again on the new connection.
    input
        .send(ControlEvent::PressStart("right".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("8".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_press_while_disconnected_is_dropped_silently() {
    // Reserve a port with no listener behind it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (input, mut status, client) = start_client(addr);

    // Give the client time to fail at least one connection attempt.
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Pressing while disconnected neither errors nor kills the client.
    input
        .send(ControlEvent::PressStart("forward".into()))
        .await
        .unwrap();
    input
        .send(ControlEvent::PressEnd("forward".into()))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!client.is_finished(), "Client must keep retrying");

    // Once the rover appears on that port, the client connects and no
    // stale command from the offline period is replayed.
    let listener = TcpListener::bind(addr).await.unwrap();
    let (event_tx, mut events) = mpsc::channel(64);
    let rover = tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        let _ = event_tx.send(RoverEvent::Connected).await;
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            if event_tx.send(RoverEvent::Frame(text)).await.is_err() {
                break;
            }
        }
    });

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    input
        .send(ControlEvent::PressStart("left".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("4".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_press_during_dial_is_not_replayed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (event_tx, mut events) = mpsc::channel(64);
    let rover = tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        // Hold the handshake so the client's dial stays in flight.
        tokio::time::sleep(Duration::from_millis(700)).await;
        let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        let _ = event_tx.send(RoverEvent::Connected).await;
        while let Some(Ok(Message::Text(text))) = ws.next().await {
            if event_tx.send(RoverEvent::Frame(text)).await.is_err() {
                break;
            }
        }
    });

    let (input, mut status, client) = start_client(addr);

    // Let the dial reach the stalled handshake, then press while the link
    // is still not open. These codes must be dropped, not queued.
    tokio::time::sleep(Duration::from_millis(200)).await;
    input
        .send(ControlEvent::PressStart("forward".into()))
        .await
        .unwrap();
    input
        .send(ControlEvent::PressEnd("forward".into()))
        .await
        .unwrap();

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);
    wait_for_status(&mut status, Status::Connected).await;

    // The first frame the rover sees is the live press, not a stale
    // replay from the dial window.
    input
        .send(ControlEvent::PressStart("backward".into()))
        .await
        .unwrap();
    assert_eq!(recv_event(&mut events).await, RoverEvent::Frame("2".into()));

    client.abort();
    rover.abort();
}

#[tokio::test]
async fn test_client_stops_when_inputs_dropped() {
    let (addr, mut events, _kick, rover) = start_rover().await;
    let (input, _status, client) = start_client(addr);

    assert_eq!(recv_event(&mut events).await, RoverEvent::Connected);

    drop(input);

    timeout(Duration::from_secs(5), client)
        .await
        .expect("Client should shut down once all inputs are dropped")
        .unwrap();

    rover.abort();
}
