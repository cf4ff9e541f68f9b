//! Outbound side of a channel.
//!
//! Everything the channel or its collaborators print goes through
//! [`Output`], which optionally expands bare LF into CR-LF for terminals
//! and devices that need it. Expansion runs through a small staging
//! buffer so it never allocates.

use core::fmt;

use crate::channel::transport::Transport;
use crate::error::{Error, Result};

/// Staging buffer size for CR insertion.
const STAGE_SIZE: usize = 80;

pub struct Output<T: Transport> {
    transport: T,
    add_cr: bool,
    /// Last byte written, carried across calls so a CR-LF split over two
    /// writes is not doubled.
    last: u8,
}

impl<T: Transport> Output<T> {
    pub fn new(transport: T, add_cr: bool) -> Self {
        Self {
            transport,
            add_cr,
            last: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Write all of `data`, expanding LF if configured.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        if !self.add_cr {
            if let Some(&b) = data.last() {
                self.last = b;
            }
            return self.write_all(data);
        }

        let mut stage = [0u8; STAGE_SIZE];
        let mut rest = data;
        while !rest.is_empty() {
            // Leave one slot free in case the last byte needs a CR.
            let mut k = 0;
            let mut used = 0;
            for &c in rest {
                if k >= STAGE_SIZE - 1 {
                    break;
                }
                if c == b'\n' && self.last != b'\r' {
                    stage[k] = b'\r';
                    k += 1;
                }
                stage[k] = c;
                k += 1;
                self.last = c;
                used += 1;
            }
            self.write_all(&stage[..k])?;
            rest = &rest[used..];
        }
        Ok(())
    }

    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())?;
        self.write_bytes(b"\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.transport
            .flush()
            .map_err(|_| Error::Transport("flush failed"))
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.transport.write(data) {
                Ok(0) => return Err(Error::Transport("write stalled")),
                Ok(n) => data = &data[n..],
                Err(_) => return Err(Error::Transport("write failed")),
            }
        }
        Ok(())
    }
}

impl<T: Transport> fmt::Write for Output<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
