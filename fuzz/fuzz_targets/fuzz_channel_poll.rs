//! Fuzz target: `Channel::poll`
//!
//! Pushes arbitrary bytes through a whole channel, alternating line and
//! event-only polls, with auto-reporting enabled. The channel must never
//! panic and must accept a clean line afterwards.
//!
//! cargo fuzz run fuzz_channel_poll

#![no_main]

use core::cell::Cell;
use core::fmt;

use cncmux::app::ports::{Clock, RealtimeExecutor, StatusReporter};
use cncmux::channel::realtime::RealtimeCmd;
use cncmux::channel::transport::BufferTransport;
use cncmux::machine::{CoordIndex, MachineSnapshot, RunState};
use cncmux::{Channel, ChannelConfig, ChannelId, PollContext};
use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;

struct FuzzClock(Cell<u32>);

impl DelayNs for FuzzClock {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl Clock for FuzzClock {
    fn now_ms(&self) -> u32 {
        let now = self.0.get();
        self.0.set(now.wrapping_add(7));
        now
    }
}

struct Sink;

impl RealtimeExecutor for Sink {
    fn execute(&mut self, _cmd: RealtimeCmd, _origin: ChannelId, out: &mut dyn fmt::Write) {
        let _ = out.write_str("<Idle>\n");
    }
}

impl StatusReporter for Sink {
    fn recompute_pin_string(&mut self) {}

    fn pin_string(&self) -> &str {
        "P"
    }

    fn report_realtime_status(&mut self, _m: &MachineSnapshot, out: &mut dyn fmt::Write) {
        let _ = out.write_str("<Run>\n");
    }

    fn report_ngc_coord(&mut self, _c: CoordIndex, _out: &mut dyn fmt::Write) {}

    fn report_gcode_modes(&mut self, _m: &MachineSnapshot, _out: &mut dyn fmt::Write) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ChannelConfig {
        report_interval_ms: 50,
        ..ChannelConfig::default()
    };
    let Ok(mut channel) = Channel::new(
        ChannelId(0),
        "fuzz",
        BufferTransport::<64, 64>::new(),
        FuzzClock(Cell::new(u32::MAX - 100)),
        &config,
    ) else {
        return;
    };
    let machine = MachineSnapshot {
        state: RunState::Cycle,
        ..MachineSnapshot::default()
    };
    let mut executor = Sink;
    let mut reporter = Sink;
    let mut ctx = PollContext {
        machine: &machine,
        realtime: &mut executor,
        reporter: &mut reporter,
    };

    // Feed in small chunks; output is drained so writes never stall.
    for (i, chunk) in data.chunks(16).enumerate() {
        channel.transport_mut().inject(chunk);
        while channel.poll(i % 3 != 0, &mut ctx).is_some() {}
        channel.transport_mut().take_output();
    }

    // A newline ends any sequence the input left open.
    channel.transport_mut().inject(b"\n");
    while channel.poll(true, &mut ctx).is_some() {}
    channel.flush_rx();
    channel.transport_mut().inject(b"M2\n");
    let line = channel.poll(true, &mut ctx);
    assert_eq!(line.as_deref(), Some("M2"));
});
