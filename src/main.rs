//! cncmux bring-up firmware — Main Entry Point
//!
//! Runs one channel over UART0 and answers every received line with
//! `ok`, so a G-code sender can be pointed at the board to exercise
//! framing, realtime commands and auto-reports end to end.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  UART0 ──▶ Channel ──▶ line ──▶ ack(ok)                    │
//! │              │                                             │
//! │              ├──▶ BringUpExecutor   (realtime commands)    │
//! │              └──▶ BringUpReporter   (auto-report bodies)   │
//! │                                                            │
//! │  HwSolenoid ◀── simulated Z position                       │
//! └────────────────────────────────────────────────────────────┘
//! ```

use core::fmt;

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;

use cncmux::adapters::time::SystemClock;
use cncmux::adapters::uart::UartTransport;
use cncmux::app::ports::{Clock, MotorDriver, RealtimeExecutor, StatusReporter};
use cncmux::channel::realtime::RealtimeCmd;
use cncmux::drivers::solenoid::{HwSolenoid, UPDATE_RATE_MS};
use cncmux::machine::{CoordIndex, MachineSnapshot, RunState};
use cncmux::{Channel, ChannelConfig, ChannelId, PollContext, Status};

const BAUD_RATE: u32 = 115_200;

/// Default channel configuration, overridable by a JSON literal at build time.
const CONFIG_JSON: Option<&str> = option_env!("CNCMUX_CHANNEL_CONFIG");

// ── Realtime executor ─────────────────────────────────────────

/// Tracks run state from feed-hold / cycle-start / reset so the
/// auto-reporter has something to report.
struct BringUpExecutor {
    state: RunState,
}

impl RealtimeExecutor for BringUpExecutor {
    fn execute(&mut self, cmd: RealtimeCmd, origin: ChannelId, out: &mut dyn fmt::Write) {
        info!("Realtime {:?} from channel {}", cmd, origin);
        match cmd {
            RealtimeCmd::Reset => self.state = RunState::Idle,
            RealtimeCmd::FeedHold => self.state = RunState::Hold,
            RealtimeCmd::CycleStart => self.state = RunState::Cycle,
            RealtimeCmd::StatusReport => {
                let _ = writeln!(out, "<{:?}>", self.state);
            }
            _ => {}
        }
    }
}

// ── Status reporter ───────────────────────────────────────────

struct BringUpReporter;

impl StatusReporter for BringUpReporter {
    fn recompute_pin_string(&mut self) {}

    fn pin_string(&self) -> &str {
        ""
    }

    fn report_realtime_status(&mut self, machine: &MachineSnapshot, out: &mut dyn fmt::Write) {
        let _ = writeln!(out, "<{:?}|FS:{},{}>", machine.state, machine.feed_rate, machine.spindle_speed);
    }

    fn report_ngc_coord(&mut self, coord: CoordIndex, out: &mut dyn fmt::Write) {
        let _ = writeln!(out, "[{:?}:0.000,0.000,0.000]", coord);
    }

    fn report_gcode_modes(&mut self, machine: &MachineSnapshot, out: &mut dyn fmt::Write) {
        let _ = writeln!(out, "[GC:{:?} T{}]", machine.modal, machine.tool);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  cncmux v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match CONFIG_JSON.map(ChannelConfig::from_json) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            warn!("Channel config rejected ({}), using defaults", e);
            ChannelConfig::default()
        }
        None => ChannelConfig::default(),
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let uart = UartDriver::new(
        peripherals.uart0,
        pins.gpio43,
        pins.gpio44,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(BAUD_RATE)),
    )?;
    let mut solenoid = HwSolenoid::new(2, Some(PinDriver::output(pins.gpio4)?), false);
    solenoid.init();

    // ── 4. Channel ────────────────────────────────────────────
    let mut channel = Channel::new(
        ChannelId(0),
        "uart0",
        UartTransport::new(uart),
        SystemClock::new(),
        &config,
    )?;

    let mut executor = BringUpExecutor { state: RunState::Idle };
    let mut reporter = BringUpReporter;
    let mut machine = MachineSnapshot::default();
    let mut last_update = 0u32;

    info!("Channel {} ready", channel.name());

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        machine.state = executor.state;
        let line = {
            let mut ctx = PollContext {
                machine: &machine,
                realtime: &mut executor,
                reporter: &mut reporter,
            };
            channel.poll(true, &mut ctx)
        };

        if let Some(line) = line {
            info!("Line: {}", line);
            if let Err(e) = channel.ack(Status::Ok) {
                warn!("Ack failed: {}", e);
            }
        }

        let now = channel.clock().now_ms();
        if now.wrapping_sub(last_update) >= UPDATE_RATE_MS {
            last_update = now;
            let z = if machine.state == RunState::Cycle { 1.0 } else { 0.0 };
            solenoid.update(&[0.0, 0.0, z]);
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(1);
    }
}
