//! Unified error types for the channel multiplexer.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be counted, logged, and dropped inside the poll
//! loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The transport refused or stalled a write.
    Transport(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
    /// A registered event target failed while handling a pin edge.
    Event(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Event(msg) => write!(f, "event: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Ways the UTF-8 multiplexing envelope can be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A continuation byte arrived with no sequence in progress.
    UnexpectedContinuation(u8),
    /// A byte that can never start a sequence (0xC0, 0xC1, 0xF5..=0xFF).
    InvalidLead(u8),
    /// A non-continuation byte interrupted a sequence; the byte is consumed.
    Truncated(u8),
    /// The sequence encodes a value that has a shorter encoding.
    Overlong,
    /// The sequence encodes a UTF-16 surrogate.
    Surrogate,
    /// The sequence encodes a value above U+10FFFF.
    OutOfRange,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedContinuation(b) => write!(f, "unexpected continuation byte 0x{b:02x}"),
            Self::InvalidLead(b) => write!(f, "invalid lead byte 0x{b:02x}"),
            Self::Truncated(b) => write!(f, "sequence interrupted by 0x{b:02x}"),
            Self::Overlong => write!(f, "overlong encoding"),
            Self::Surrogate => write!(f, "surrogate code point"),
            Self::OutOfRange => write!(f, "code point out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
