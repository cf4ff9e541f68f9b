//! cncmux: channel multiplexer for motion-controller firmware.
//!
//! One [`Channel`] per transport turns a raw byte stream into text lines,
//! realtime commands and I/O-extender pin events, and decides when
//! unsolicited status reports go back out the same stream.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod channel;
pub mod config;
pub mod drivers;
pub mod error;
pub mod machine;
pub mod status;

pub use channel::{Channel, ChannelId, PollContext};
pub use config::{ChannelConfig, MessageLevel};
pub use error::{DecodeError, Error, Result};
pub use status::Status;
