//! Line framer.
//!
//! Accumulates literal characters into a fixed-capacity buffer and hands
//! back a completed line on CR, LF or CR-LF. Backspace erases the last
//! buffered character.

use log::warn;

/// Line buffer capacity in bytes, including room for a terminator.
pub const LINE_CAPACITY: usize = 256;

/// Longest line content that can be assembled.
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// A completed line, without its terminator.
pub type Line = heapless::String<MAX_LINE_LEN>;

const BACKSPACE: char = '\u{8}';

#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Line,
    last_was_cr: bool,
    /// Characters dropped from the line being assembled.
    dropped: usize,
}

/// Outcome of feeding one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// Character consumed, line still open.
    Pending,
    /// Line buffer full; the character was dropped.
    Overflow,
    Complete(Line),
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, ch: char) -> Feed {
        // CR completes immediately; an LF right after it belongs to the
        // same ending and is swallowed.
        if ch == '\n' {
            if self.last_was_cr {
                self.last_was_cr = false;
                return Feed::Pending;
            }
            return Feed::Complete(self.take());
        }
        self.last_was_cr = ch == '\r';
        if self.last_was_cr {
            return Feed::Complete(self.take());
        }

        if ch == BACKSPACE {
            self.buf.pop();
            return Feed::Pending;
        }

        // Overflow keeps what was buffered and ignores the excess.
        if self.buf.push(ch).is_err() {
            if self.dropped == 0 {
                warn!("LineFramer: line exceeds {} bytes, dropping input", MAX_LINE_LEN);
            }
            self.dropped += 1;
            return Feed::Overflow;
        }
        Feed::Pending
    }

    /// Discard the partial line and any pending CR state.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.last_was_cr = false;
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn last_was_cr(&self) -> bool {
        self.last_was_cr
    }

    fn take(&mut self) -> Line {
        self.dropped = 0;
        core::mem::take(&mut self.buf)
    }
}
