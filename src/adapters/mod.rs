//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter | Implements | Connects to               |
//! |---------|------------|---------------------------|
//! | `time`  | Clock      | ESP32 system timer / std  |
//! | `uart`  | Transport  | ESP-IDF UART driver       |

pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
