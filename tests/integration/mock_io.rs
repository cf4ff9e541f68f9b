//! Mock I/O for integration tests.
//!
//! A scripted transport and a fake clock share one time base, so bytes
//! can be scheduled to "arrive" while the channel is busy-waiting on its
//! ack gate. Collaborators record every call for later assertions.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use cncmux::app::ports::{Clock, EventPin, RealtimeExecutor, StatusReporter};
use cncmux::channel::codec::{Token, encode, encode_token};
use cncmux::channel::line::Line;
use cncmux::channel::pins::PinValue;
use cncmux::channel::realtime::RealtimeCmd;
use cncmux::channel::transport::Transport;
use cncmux::machine::{CoordIndex, MachineSnapshot};
use cncmux::{Channel, ChannelConfig, ChannelId, Error, PollContext, Result};
use embedded_hal::delay::DelayNs;

/// Nanoseconds since test start, shared by clock and transport.
pub type SharedTime = Rc<Cell<u64>>;

const NS_PER_MS: u64 = 1_000_000;

fn now_ms(time: &SharedTime) -> u32 {
    (time.get() / NS_PER_MS) as u32
}

// ── FakeClock ─────────────────────────────────────────────────

/// Delays advance the shared time instead of sleeping.
pub struct FakeClock {
    time: SharedTime,
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.time.set(self.time.get() + u64::from(ns));
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        now_ms(&self.time)
    }
}

// ── ScriptedTransport ─────────────────────────────────────────

pub struct ScriptedTransport {
    time: SharedTime,
    rx: VecDeque<u8>,
    /// Bytes released into `rx` once the clock reaches the given ms.
    scheduled: Vec<(u32, Vec<u8>)>,
    tx: Vec<u8>,
}

impl ScriptedTransport {
    fn release_due(&mut self) {
        let now = now_ms(&self.time);
        let mut i = 0;
        while i < self.scheduled.len() {
            if self.scheduled[i].0 <= now {
                let (_, bytes) = self.scheduled.remove(i);
                self.rx.extend(bytes);
            } else {
                i += 1;
            }
        }
    }
}

impl Transport for ScriptedTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, ()> {
        self.release_due();
        let mut n = 0;
        while n < buf.len() {
            let Some(b) = self.rx.pop_front() else { break };
            buf[n] = b;
            n += 1;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> core::result::Result<usize, ()> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> core::result::Result<(), ()> {
        Ok(())
    }
}

// ── Collaborators ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Vec<(RealtimeCmd, ChannelId)>,
}

impl RealtimeExecutor for RecordingExecutor {
    fn execute(&mut self, cmd: RealtimeCmd, origin: ChannelId, out: &mut dyn fmt::Write) {
        self.calls.push((cmd, origin));
        if cmd == RealtimeCmd::StatusReport {
            let _ = out.write_str("<Idle>\n");
        }
    }
}

#[allow(dead_code)]
impl RecordingExecutor {
    pub fn commands(&self) -> Vec<RealtimeCmd> {
        self.calls.iter().map(|(cmd, _)| *cmd).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    Status,
    Ngc(CoordIndex),
    Modes,
}

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Vec<Report>,
    pub pins: String,
    pub recomputes: usize,
    pub wco_resets: usize,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn count(&self, report: Report) -> usize {
        self.reports.iter().filter(|r| **r == report).count()
    }
}

impl StatusReporter for RecordingReporter {
    fn recompute_pin_string(&mut self) {
        self.recomputes += 1;
    }

    fn pin_string(&self) -> &str {
        &self.pins
    }

    fn report_realtime_status(&mut self, _machine: &MachineSnapshot, out: &mut dyn fmt::Write) {
        self.reports.push(Report::Status);
        let _ = out.write_str("<status>\n");
    }

    fn report_ngc_coord(&mut self, coord: CoordIndex, out: &mut dyn fmt::Write) {
        self.reports.push(Report::Ngc(coord));
        let _ = out.write_str("[ngc]\n");
    }

    fn report_gcode_modes(&mut self, _machine: &MachineSnapshot, out: &mut dyn fmt::Write) {
        self.reports.push(Report::Modes);
        let _ = out.write_str("[GC]\n");
    }

    fn reset_wco_counter(&mut self) {
        self.wco_resets += 1;
    }
}

/// Event pin that records edges, optionally failing every trigger.
#[derive(Default)]
pub struct RecordingPin {
    pub edges: Vec<bool>,
    pub fail: bool,
}

impl EventPin for RecordingPin {
    fn trigger(&mut self, active: bool) -> Result<()> {
        self.edges.push(active);
        if self.fail {
            return Err(Error::Event("consumer rejected edge"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recording pin"
    }
}

#[allow(dead_code)]
pub fn shared_pin(fail: bool) -> (Rc<RefCell<RecordingPin>>, Rc<RefCell<dyn EventPin>>) {
    let pin = Rc::new(RefCell::new(RecordingPin {
        edges: Vec::new(),
        fail,
    }));
    let as_dyn: Rc<RefCell<dyn EventPin>> = pin.clone();
    (pin, as_dyn)
}

// ── Harness ───────────────────────────────────────────────────

pub type TestChannel = Channel<ScriptedTransport, FakeClock>;

/// A channel plus everything a poll needs.
pub struct Harness {
    pub channel: TestChannel,
    pub machine: MachineSnapshot,
    pub executor: RecordingExecutor,
    pub reporter: RecordingReporter,
    pub time: SharedTime,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(config: &ChannelConfig) -> Self {
        Self::starting_at(config, 0)
    }

    pub fn starting_at(config: &ChannelConfig, start_ms: u32) -> Self {
        let time: SharedTime = Rc::new(Cell::new(u64::from(start_ms) * NS_PER_MS));
        let transport = ScriptedTransport {
            time: time.clone(),
            rx: VecDeque::new(),
            scheduled: Vec::new(),
            tx: Vec::new(),
        };
        let clock = FakeClock { time: time.clone() };
        let channel = Channel::new(ChannelId(3), "mock", transport, clock, config)
            .expect("valid test config");
        Self {
            channel,
            machine: MachineSnapshot::default(),
            executor: RecordingExecutor::default(),
            reporter: RecordingReporter::default(),
            time,
        }
    }

    pub fn poll(&mut self, want_line: bool) -> Option<Line> {
        let mut ctx = PollContext {
            machine: &self.machine,
            realtime: &mut self.executor,
            reporter: &mut self.reporter,
        };
        self.channel.poll(want_line, &mut ctx)
    }

    /// Poll until no line comes back, collecting every line.
    pub fn lines(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = self.poll(true) {
            out.push(line.as_str().to_owned());
        }
        out
    }

    pub fn set_attr(&mut self, index: usize, value: Option<PinValue>, msg: &str) -> Result<()> {
        let mut ctx = PollContext {
            machine: &self.machine,
            realtime: &mut self.executor,
            reporter: &mut self.reporter,
        };
        self.channel.set_attr(index, value, msg, &mut ctx)
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.channel.transport_mut().rx.extend(bytes.iter().copied());
    }

    pub fn feed_token(&mut self, token: Token) {
        let mut buf = [0u8; 4];
        let bytes = encode_token(token, &mut buf).to_vec();
        self.feed(&bytes);
    }

    pub fn feed_code(&mut self, code: u32) {
        let mut buf = [0u8; 4];
        let bytes = encode(code, &mut buf).expect("valid scalar").to_vec();
        self.feed(&bytes);
    }

    /// Deliver `token` once the clock reaches `at_ms`.
    pub fn schedule_token(&mut self, at_ms: u32, token: Token) {
        let mut buf = [0u8; 4];
        let bytes = encode_token(token, &mut buf).to_vec();
        self.channel.transport_mut().scheduled.push((at_ms, bytes));
    }

    pub fn advance_ms(&self, ms: u32) {
        self.time.set(self.time.get() + u64::from(ms) * NS_PER_MS);
    }

    pub fn now_ms(&self) -> u32 {
        now_ms(&self.time)
    }

    /// Everything written so far, drained.
    pub fn take_output(&mut self) -> String {
        let tx = std::mem::take(&mut self.channel.transport_mut().tx);
        String::from_utf8(tx).expect("utf8 output")
    }
}
