//! # rovctl-core
//!
//! Core rover remote-control model.
//!
//! This crate provides:
//! - The intent-to-command-code mapping sent over the wire
//! - Press tracking (the single "active button" rule)
//! - The link state machine (connecting / open / closed)
//! - Status projection for display
//!
//! This crate is intentionally runtime-agnostic and contains no async code,
//! making it usable on both Linux (tokio) and ESP32 (esp-idf) targets.

pub mod command;
pub mod link;
pub mod press;
pub mod status;

pub use command::{command_code, Intent, UnknownControl, STOP_CODE};
pub use link::{LinkEvent, LinkState};
pub use press::PressTracker;
pub use status::Status;
