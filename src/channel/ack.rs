//! Ack gate: flow control for configuration writes to the I/O extender.
//!
//! At most one attribute message may be unacknowledged. The gate is armed
//! by the write that sends a message and released only by an ACK or NAK
//! decoded from the input stream. A sender that finds the gate armed
//! waits for it (see `Channel::set_attr`) for a bounded number of 1 ms
//! iterations, then proceeds anyway.

use log::{debug, error};

#[derive(Debug)]
pub struct AckGate {
    pending: bool,
    /// Wait budget in 1 ms iterations.
    timeout_iterations: u32,
}

impl AckGate {
    pub fn new(timeout_iterations: u32) -> Self {
        Self {
            pending: false,
            timeout_iterations: timeout_iterations.max(1),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn timeout_iterations(&self) -> u32 {
        self.timeout_iterations
    }

    /// A message went out; the next one must wait for its ACK/NAK.
    pub fn arm(&mut self) {
        self.pending = true;
    }

    pub fn on_ack(&mut self) {
        debug!("AckGate: ACK");
        self.pending = false;
    }

    pub fn on_nak(&mut self) {
        error!("Channel device rejected config");
        debug!("AckGate: NAK");
        self.pending = false;
    }
}
