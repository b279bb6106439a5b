//! # rovctl-client
//!
//! Rover remote-control WebSocket client.
//!
//! This crate provides the connection manager and control input handler:
//! - A tokio task that keeps one control link open to the rover,
//!   reconnecting indefinitely at a fixed delay after every closure
//! - An input channel translating press/release/pointer-leave events into
//!   single-character command frames
//! - A broadcast channel projecting the link lifecycle into a display
//!   status, delivering every transition including transient errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rovctl_client::{ClientConfig, ControlEvent, RemoteClient};
//!
//! let client = RemoteClient::new(ClientConfig::default());
//! let input = client.input_sender();
//! let status = client.status_receiver();
//! tokio::spawn(client.run());
//!
//! input.send(ControlEvent::PressStart("forward".into())).await?;
//! input.send(ControlEvent::PressEnd("forward".into())).await?;
//! ```

pub mod client;
pub mod config;

pub use client::{ControlEvent, RemoteClient};
pub use config::{ClientConfig, ConfigError};

// Re-export the display status so binaries only need this crate.
pub use rovctl_core::Status;
