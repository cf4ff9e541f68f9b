//! Pending queue of characters decoded while no line was wanted.
//!
//! When the caller polls only for out-of-band events (the ack gate does
//! this while it waits), literal characters are still decoded so that
//! the ACK or pin event behind them can be seen. They park here, in
//! arrival order, until the next line-oriented poll drains them.

use heapless::Deque;

/// Queue depth. Overflow drops the newest character.
pub const PENDING_CAPACITY: usize = 256;

#[derive(Debug, Default)]
pub struct PendingQueue {
    queue: Deque<char, PENDING_CAPACITY>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character. Returns `false` if the queue is full and the
    /// character was dropped.
    pub fn push(&mut self, ch: char) -> bool {
        self.queue.push_back(ch).is_ok()
    }

    pub fn pop(&mut self) -> Option<char> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
