//! Port traits at the boundary between the channel core and its collaborators.
//!
//! ```text
//!   Transport ──▶ Channel ──▶ RealtimeExecutor
//!                   │   └───▶ EventPin (pin edges)
//!     Clock ──────▶ │
//!                   └───────▶ StatusReporter (auto-report)
//! ```
//!
//! The interpreter, report renderers and I/O-extender consumers live on
//! the other side of these traits. The channel only decides *when* to
//! call them, so every path through it is testable with fakes.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::channel::ChannelId;
use crate::channel::realtime::RealtimeCmd;
use crate::error::Result;
use crate::machine::{CoordIndex, MachineSnapshot};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond tick source plus a blocking delay.
///
/// `now_ms` wraps at `u32::MAX`; every deadline comparison in the crate
/// uses signed differences so the wrap is invisible.
pub trait Clock: DelayNs {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event pin port (driven adapter: channel → I/O extender consumer)
// ───────────────────────────────────────────────────────────────

/// Receiver of remote digital input edges.
///
/// Registered with a channel by the subsystem that owns it. An `Err`
/// is logged and discarded at the dispatch boundary.
pub trait EventPin {
    fn trigger(&mut self, active: bool) -> Result<()>;

    fn name(&self) -> &str {
        "event pin"
    }
}

// ───────────────────────────────────────────────────────────────
// Realtime executor port
// ───────────────────────────────────────────────────────────────

/// Executes realtime commands as soon as they are decoded.
///
/// `origin` identifies the channel the byte arrived on; `out` writes back
/// to that same channel (a status query is answered there).
pub trait RealtimeExecutor {
    fn execute(&mut self, cmd: RealtimeCmd, origin: ChannelId, out: &mut dyn fmt::Write);
}

// ───────────────────────────────────────────────────────────────
// Status reporter port (report rendering lives outside the core)
// ───────────────────────────────────────────────────────────────

/// Renders reports into the channel's output when the scheduler asks.
pub trait StatusReporter {
    /// Rebuild the cached input-pin string (called when the probe changes).
    fn recompute_pin_string(&mut self);

    /// The current input-pin string, compared against the cached copy.
    fn pin_string(&self) -> &str;

    fn report_realtime_status(&mut self, machine: &MachineSnapshot, out: &mut dyn fmt::Write);

    fn report_ngc_coord(&mut self, coord: CoordIndex, out: &mut dyn fmt::Write);

    fn report_gcode_modes(&mut self, machine: &MachineSnapshot, out: &mut dyn fmt::Write);

    /// Force the next status report to carry work-coordinate offsets.
    fn reset_wco_counter(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Motor driver port
// ───────────────────────────────────────────────────────────────

/// Capability shared by the motor drivers built on top of a channel.
pub trait MotorDriver {
    fn name(&self) -> &'static str;

    /// One-time setup; drivers with missing hardware latch an error here.
    fn init(&mut self);

    /// Periodic refresh with the current machine position of each axis.
    fn update(&mut self, mpos: &[f32]);

    fn set_disable(&mut self, disable: bool);
}
