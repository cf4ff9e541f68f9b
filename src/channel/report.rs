//! Auto-report scheduler.
//!
//! Decides, once per poll pass, whether the channel owes its peer an
//! unsolicited report. The report bodies are rendered by the
//! [`StatusReporter`] port; this module only decides *when*.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Report Triggers                          │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ Run state │  │ Probe /   │  │ WCO       │  │ Deadline │   │
//! │  │ change    │  │ pin string│  │ changed   │  │ (moving) │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        └──────────────┴──────┬───────┴──────────────┘        │
//! │                              ▼                               │
//! │                   report_realtime_status                     │
//! │                                                              │
//! │  named-coordinate request ──▶ report_ngc_coord (one-shot)    │
//! │  modal / tool / S / F diff ──▶ report_gcode_modes            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use core::fmt;

use log::debug;

use crate::app::ports::StatusReporter;
use crate::machine::{CoordIndex, MachineSnapshot, ModalState, RunState};

/// Nonzero intervals are clamped up to this, bounding report frequency.
pub const MIN_REPORT_INTERVAL_MS: u32 = 50;


/// Which reports one tick produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emitted {
    pub status: bool,
    pub ngc: bool,
    pub modes: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct AutoReportScheduler {
    /// 0 disables auto-reporting.
    interval_ms: u32,
    /// Tick value at which the next periodic status report is due.
    next_deadline: u32,

    // Cached state as of the last status report.
    last_state: RunState,
    last_probe: bool,
    last_pins: PinSignature,

    // Cached state as of the last modal report. `None` forces a report.
    last_modal: ModalState,
    last_tool: Option<u32>,
    last_spindle_speed: u32,
    last_feed_rate: f32,

    /// Work-coordinate offsets changed since the last status report.
    report_wco: bool,
    /// Named-coordinate report requested out of band.
    report_ngc: Option<CoordIndex>,
}

impl Default for AutoReportScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoReportScheduler {
    pub fn new() -> Self {
        Self {
            interval_ms: 0,
            next_deadline: 0,
            last_state: RunState::Idle,
            last_probe: false,
            last_pins: PinSignature::EMPTY,
            last_modal: ModalState::default(),
            last_tool: None,
            last_spindle_speed: 0,
            last_feed_rate: 0.0,
            report_wco: false,
            report_ngc: None,
        }
    }

    /// Set the report interval. Returns the interval actually applied.
    ///
    /// A nonzero request is clamped to [`MIN_REPORT_INTERVAL_MS`]. The
    /// next status report becomes due immediately and the next modal
    /// comparison reports unconditionally.
    pub fn set_interval(&mut self, ms: u32, now: u32) -> u32 {
        let actual = if ms == 0 {
            0
        } else {
            ms.max(MIN_REPORT_INTERVAL_MS)
        };
        if actual != ms {
            debug!("AutoReport: interval {}ms clamped to {}ms", ms, actual);
        }
        self.interval_ms = actual;
        self.next_deadline = now;
        self.last_tool = None;
        actual
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_enabled(&self) -> bool {
        self.interval_ms != 0
    }

    pub fn next_deadline(&self) -> u32 {
        self.next_deadline
    }

    /// Work-coordinate offsets changed; the next tick reports status.
    pub fn request_wco_report(&mut self) {
        self.report_wco = true;
    }

    /// Emit a named-coordinate report on the next tick, once.
    pub fn request_ngc_report(&mut self, coord: CoordIndex) {
        self.report_ngc = Some(coord);
    }

    /// Run one scheduling pass.
    pub fn tick(
        &mut self,
        now: u32,
        machine: &MachineSnapshot,
        reporter: &mut dyn StatusReporter,
        out: &mut dyn fmt::Write,
    ) -> Emitted {
        let mut emitted = Emitted::default();
        if self.interval_ms == 0 {
            return emitted;
        }

        let probe = machine.probe;
        if probe != self.last_probe {
            reporter.recompute_pin_string();
        }

        let pins = PinSignature::of(reporter.pin_string());
        let deadline_reached = (now.wrapping_sub(self.next_deadline) as i32) >= 0;

        if self.report_wco
            || machine.state != self.last_state
            || probe != self.last_probe
            || self.last_pins != pins
            || (machine.state.is_moving() && deadline_reached)
        {
            if self.report_wco {
                reporter.reset_wco_counter();
            }
            self.report_wco = false;
            self.last_state = machine.state;
            self.last_probe = probe;
            self.last_pins = pins;

            self.next_deadline = now.wrapping_add(self.interval_ms);
            reporter.report_realtime_status(machine, out);
            emitted.status = true;
        }

        if let Some(coord) = self.report_ngc.take() {
            reporter.report_ngc_coord(coord, out);
            emitted.ngc = true;
        }

        if self.modes_changed(machine) {
            reporter.report_gcode_modes(machine, out);
            self.last_modal = machine.modal;
            self.last_tool = Some(machine.tool);
            self.last_spindle_speed = machine.spindle_speed;
            self.last_feed_rate = machine.feed_rate;
            emitted.modes = true;
        }

        emitted
    }

    /// Modal-report decision.
    ///
    /// While moving, a change of motion mode alone (G0/G1/G2/G3) does not
    /// count, and S/F changes are left to the periodic status report.
    fn modes_changed(&mut self, machine: &MachineSnapshot) -> bool {
        let moving = machine.state.is_moving();
        if moving {
            self.last_modal.motion = machine.modal.motion;
        }
        self.last_modal != machine.modal
            || self.last_tool != Some(machine.tool)
            || (!moving
                && (self.last_spindle_speed != machine.spindle_speed
                    || self.last_feed_rate.to_bits() != machine.feed_rate.to_bits()))
    }
}

/// Length plus FNV-1a digest of the whole pin string.
///
/// The live string is borrowed from the reporter, which must be free for
/// `&mut` calls in the same tick, so only this copyable summary is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PinSignature {
    len: usize,
    hash: u64,
}

impl PinSignature {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    const EMPTY: Self = Self {
        len: 0,
        hash: Self::OFFSET,
    };

    fn of(s: &str) -> Self {
        let hash = s
            .bytes()
            .fold(Self::OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(Self::PRIME));
        Self { len: s.len(), hash }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
