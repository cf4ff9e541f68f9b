//! UART transport (ESP-IDF only).
//!
//! Wraps an `esp_idf_hal` `UartDriver` as a non-blocking [`Transport`]:
//! reads never wait, writes block only until the bytes are queued in the
//! driver's TX ring.

use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartDriver;

use crate::channel::transport::Transport;

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(BLOCK)
    }
}
