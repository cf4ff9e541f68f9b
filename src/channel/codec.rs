//! Byte decoder for the multiplexed input stream.
//!
//! The stream is UTF-8. Ordinary text rides in it unchanged; control
//! codes that do not fit in seven bits reuse the multi-byte encoding as
//! an envelope:
//!
//! ```text
//!   0x00..=0x7F      literal ASCII, or one of the ASCII realtime codes
//!   U+0080..=U+00A1  realtime commands           (2 bytes: C2 xx)
//!   U+00B2 / U+00B3  ACK / NAK from the device   (2 bytes: C2 B2 / C2 B3)
//!   U+0100..=U+013F  pin N went inactive         (2 bytes: C4 xx)
//!   U+0140..=U+017F  pin N went active           (2 bytes: C5 xx)
//!   anything else    literal character
//! ```
//!
//! The decoder is fed one byte at a time and keeps its partial-sequence
//! state between calls, so bytes may arrive with arbitrary gaps.

use crate::channel::realtime::RealtimeCmd;
use crate::error::DecodeError;

/// Device acknowledged the last attribute write.
pub const PIN_ACK: u32 = 0xb2;
/// Device rejected the last attribute write.
pub const PIN_NAK: u32 = 0xb3;

/// Number of pins each edge range can address.
pub const PIN_EVENT_SLOTS: usize = 64;

pub const PIN_LOW_FIRST: u32 = 0x100;
pub const PIN_LOW_LAST: u32 = PIN_LOW_FIRST + PIN_EVENT_SLOTS as u32;
pub const PIN_HIGH_FIRST: u32 = PIN_LOW_LAST;
pub const PIN_HIGH_LAST: u32 = PIN_HIGH_FIRST + PIN_EVENT_SLOTS as u32;

/// Streaming UTF-8 decoder.
#[derive(Debug, Default)]
pub struct ByteDecoder {
    /// Continuation bytes still expected.
    remaining: u8,
    /// Total length of the sequence in progress.
    len: u8,
    value: u32,
}

impl ByteDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(Some(code))` when a sequence completes, `Ok(None)` in
    /// the middle of one. A malformed sequence yields `Err` and the
    /// decoder is ready for a fresh sequence on the next byte.
    pub fn decode(&mut self, byte: u8) -> Result<Option<u32>, DecodeError> {
        if self.remaining == 0 {
            return self.start(byte);
        }

        if byte & 0xc0 != 0x80 {
            self.reset();
            return Err(DecodeError::Truncated(byte));
        }

        self.value = (self.value << 6) | u32::from(byte & 0x3f);
        self.remaining -= 1;
        if self.remaining > 0 {
            return Ok(None);
        }

        let value = self.value;
        let len = self.len;
        self.reset();

        let min = match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if value < min {
            return Err(DecodeError::Overlong);
        }
        if (0xd800..=0xdfff).contains(&value) {
            return Err(DecodeError::Surrogate);
        }
        if value > 0x10_ffff {
            return Err(DecodeError::OutOfRange);
        }
        Ok(Some(value))
    }

    /// True while a multi-byte sequence is half-received.
    pub fn in_sequence(&self) -> bool {
        self.remaining > 0
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
        self.len = 0;
        self.value = 0;
    }

    fn start(&mut self, byte: u8) -> Result<Option<u32>, DecodeError> {
        let (len, bits) = match byte {
            0x00..=0x7f => return Ok(Some(u32::from(byte))),
            0x80..=0xbf => return Err(DecodeError::UnexpectedContinuation(byte)),
            // 0xC0 and 0xC1 can only produce overlong two-byte sequences.
            0xc2..=0xdf => (2, byte & 0x1f),
            0xe0..=0xef => (3, byte & 0x0f),
            0xf0..=0xf4 => (4, byte & 0x07),
            _ => return Err(DecodeError::InvalidLead(byte)),
        };
        self.len = len;
        self.remaining = len - 1;
        self.value = u32::from(bits);
        Ok(None)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Token classification
// ═══════════════════════════════════════════════════════════════

/// Event class of one decoded code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Char(char),
    Ack,
    Nak,
    /// Pin index and new level.
    Pin { index: u8, active: bool },
    Realtime(RealtimeCmd),
}

impl Token {
    /// Classify a decoded code. Realtime codes are reported as such here;
    /// whether they are acted on is decided by the channel.
    pub fn classify(code: u32) -> Option<Self> {
        let token = match code {
            PIN_ACK => Self::Ack,
            PIN_NAK => Self::Nak,
            PIN_LOW_FIRST..PIN_LOW_LAST => Self::Pin {
                index: (code - PIN_LOW_FIRST) as u8,
                active: false,
            },
            PIN_HIGH_FIRST..PIN_HIGH_LAST => Self::Pin {
                index: (code - PIN_HIGH_FIRST) as u8,
                active: true,
            },
            _ => match RealtimeCmd::from_code(code) {
                Some(cmd) => Self::Realtime(cmd),
                None => Self::Char(char::from_u32(code)?),
            },
        };
        Some(token)
    }

    /// Code point carried on the wire for this token.
    pub fn code(self) -> u32 {
        match self {
            Self::Char(c) => c as u32,
            Self::Ack => PIN_ACK,
            Self::Nak => PIN_NAK,
            Self::Pin { index, active: false } => PIN_LOW_FIRST + u32::from(index),
            Self::Pin { index, active: true } => PIN_HIGH_FIRST + u32::from(index),
            Self::Realtime(cmd) => cmd.code(),
        }
    }
}

/// Encode a code point into `buf`, returning the bytes written.
///
/// Used by device-side peers and tests; the firmware itself only decodes.
pub fn encode(code: u32, buf: &mut [u8; 4]) -> Option<&[u8]> {
    let c = char::from_u32(code)?;
    Some(c.encode_utf8(buf).as_bytes())
}

/// Encode a token into `buf`.
pub fn encode_token(token: Token, buf: &mut [u8; 4]) -> &[u8] {
    // Every token code is a valid scalar value by construction.
    encode(token.code(), buf).unwrap_or(&[])
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
