//! Transport abstraction over any byte-oriented stream.
//!
//! Concrete implementations:
//! - UART (see `adapters::uart`, ESP-IDF only)
//! - [`BufferTransport`] for virtual channels and host tests
//! - [`NullTransport`] for log-only channels
//!
//! The channel is generic over `Transport`, so adding a new transport
//! requires zero changes to the multiplexing logic.

use heapless::{Deque, Vec};

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes and never reads.
/// Useful for channels that only collect log output.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// In-memory transport with fixed-capacity receive and transmit buffers.
///
/// The receive side is filled with [`inject`](Self::inject); the transmit
/// side accumulates everything the channel writes until
/// [`take_output`](Self::take_output). A full transmit buffer accepts
/// nothing more until drained.
#[derive(Debug, Default)]
pub struct BufferTransport<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Vec<u8, TX>,
}

impl<const RX: usize, const TX: usize> BufferTransport<RX, TX> {
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes for the channel to read. Returns how many fit.
    pub fn inject(&mut self, data: &[u8]) -> usize {
        data.iter()
            .take_while(|b| self.rx.push_back(**b).is_ok())
            .count()
    }

    pub fn output(&self) -> &[u8] {
        &self.tx
    }

    /// Drain everything written so far.
    pub fn take_output(&mut self) -> Vec<u8, TX> {
        core::mem::take(&mut self.tx)
    }
}

impl<const RX: usize, const TX: usize> Transport for BufferTransport<RX, TX> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut n = 0;
        while n < buf.len() {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        let room = TX - self.tx.len();
        let n = data.len().min(room);
        // Cannot fail: n is bounded by the remaining capacity.
        let _ = self.tx.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
