//! Channel: one multiplexed I/O endpoint.
//!
//! A channel turns the byte stream of one transport into three event
//! classes and drives unsolicited reports back out the same stream:
//!
//! ```text
//!   transport ──▶ ByteDecoder ──▶ Token ─┬─ Ack/Nak ──▶ AckGate
//!        ▲                               ├─ Pin ──────▶ PinEventRegistry ──▶ EventPin
//!        │          PendingQueue ──┐     ├─ Realtime ─▶ RealtimeExecutor
//!        │               ▲         │     └─ Char ─┬───▶ PendingQueue   (no line wanted)
//!        │               │         └──────────────┴───▶ LineFramer ──▶ Line
//!        │
//!     Output ◀── ack / print_msg / set_attr / AutoReportScheduler
//! ```
//!
//! Everything runs on the caller's control loop. Faults on the input
//! path are logged and counted in [`ChannelStats`], never returned.

pub mod ack;
pub mod codec;
pub mod line;
pub mod output;
pub mod pending;
pub mod pins;
pub mod realtime;
pub mod report;
pub mod stats;
pub mod transport;

use core::fmt::{self, Write as _};

use log::{debug, error, info, trace};

use crate::app::ports::{Clock, RealtimeExecutor, StatusReporter};
use crate::config::{ChannelConfig, MessageLevel};
use crate::error::{Error, Result};
use crate::machine::{CoordIndex, MachineSnapshot};
use crate::status::Status;

use self::ack::AckGate;
use self::codec::{ByteDecoder, Token};
use self::line::{Feed, Line, LineFramer};
use self::output::Output;
use self::pending::PendingQueue;
use self::pins::{Dispatch, EventTarget, PinEventRegistry, PinValue};
use self::realtime::RealtimeCmd;
use self::report::AutoReportScheduler;
use self::stats::ChannelStats;
use self::transport::Transport;

/// Identity of a channel, passed to the realtime executor so replies are
/// routed back to the channel a command arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collaborators consulted during one poll.
pub struct PollContext<'a> {
    /// Read-only machine state for realtime eligibility and report diffing.
    pub machine: &'a MachineSnapshot,
    pub realtime: &'a mut dyn RealtimeExecutor,
    pub reporter: &'a mut dyn StatusReporter,
}

/// What one decoded token did to the drain pass.
enum Step {
    Continue,
    Line(Line),
}

// ═══════════════════════════════════════════════════════════════
//  Channel
// ═══════════════════════════════════════════════════════════════

pub struct Channel<T: Transport, C: Clock> {
    id: ChannelId,
    name: &'static str,
    output: Output<T>,
    clock: C,

    // Input path
    decoder: ByteDecoder,
    framer: LineFramer,
    pending: PendingQueue,
    pins: PinEventRegistry,

    // Device flow control and reporting
    ack: AckGate,
    scheduler: AutoReportScheduler,

    stats: ChannelStats,
    message_level: MessageLevel,
    verbose_errors: bool,
    realtime_enabled: bool,
}

impl<T: Transport, C: Clock> Channel<T, C> {
    /// Build a channel over `transport`.
    ///
    /// Rejects a config that fails [`ChannelConfig::validate`].
    pub fn new(
        id: ChannelId,
        name: &'static str,
        transport: T,
        clock: C,
        config: &ChannelConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut scheduler = AutoReportScheduler::new();
        if config.report_interval_ms != 0 {
            scheduler.set_interval(config.report_interval_ms, clock.now_ms());
        }

        info!(
            "Channel {} ({}): report {}ms, level {:?}",
            id, name, config.report_interval_ms, config.message_level
        );

        Ok(Self {
            id,
            name,
            output: Output::new(transport, config.add_cr),
            clock,
            decoder: ByteDecoder::new(),
            framer: LineFramer::new(),
            pending: PendingQueue::new(),
            pins: PinEventRegistry::new(),
            ack: AckGate::new(config.ack_timeout_ms),
            scheduler,
            stats: ChannelStats::default(),
            message_level: config.message_level,
            verbose_errors: config.verbose_errors,
            realtime_enabled: config.realtime_enabled,
        })
    }

    // ── Input ─────────────────────────────────────────────────

    /// Drain available input.
    ///
    /// With `want_line`, returns the first line completed during this
    /// pass. Without it, literal characters are parked in the pending
    /// queue for a later line-oriented call and only out-of-band events
    /// are handled. Auto-reporting runs whenever a pass ends without a
    /// line.
    pub fn poll(&mut self, want_line: bool, ctx: &mut PollContext<'_>) -> Option<Line> {
        loop {
            let queued = if want_line { self.pending.pop() } else { None };
            let token = match queued {
                // Re-classified so a realtime code parked while rejected
                // is judged against the current state.
                Some(ch) => Token::classify(u32::from(ch)).unwrap_or(Token::Char(ch)),
                None => {
                    let Some(byte) = self.read_byte() else {
                        break;
                    };
                    match self.decode(byte) {
                        Some(token) => token,
                        None => continue,
                    }
                }
            };

            if let Step::Line(line) = self.handle(token, want_line, ctx) {
                return Some(line);
            }
        }

        self.auto_report(ctx);
        None
    }

    /// Discard the partial line and queued characters. A multi-byte
    /// sequence in progress is left to finish.
    pub fn flush_rx(&mut self) {
        self.framer.reset();
        self.pending.clear();
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.output.transport_mut().read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                debug!("Channel {}: read failed: {:?}", self.id, e);
                None
            }
        }
    }

    fn decode(&mut self, byte: u8) -> Option<Token> {
        match self.decoder.decode(byte) {
            Ok(Some(code)) => Token::classify(code),
            Ok(None) => None,
            Err(e) => {
                debug!("Channel {}: UTF8 decoding error: {}", self.id, e);
                self.stats.decode_errors = self.stats.decode_errors.saturating_add(1);
                None
            }
        }
    }

    fn handle(&mut self, token: Token, want_line: bool, ctx: &mut PollContext<'_>) -> Step {
        let ch = match token {
            Token::Ack => {
                self.ack.on_ack();
                self.stats.acks = self.stats.acks.saturating_add(1);
                return Step::Continue;
            }
            Token::Nak => {
                self.ack.on_nak();
                self.stats.naks = self.stats.naks.saturating_add(1);
                return Step::Continue;
            }
            Token::Pin { index, active } => {
                self.pin_event(usize::from(index), active);
                return Step::Continue;
            }
            Token::Realtime(cmd) => {
                if self.realtime_allowed(cmd, ctx.machine) {
                    trace!("Channel {}: realtime {:?}", self.id, cmd);
                    self.stats.realtime_commands = self.stats.realtime_commands.saturating_add(1);
                    ctx.realtime.execute(cmd, self.id, &mut self.output);
                    return Step::Continue;
                }
                // Rejected codes are ordinary text.
                match char::from_u32(cmd.code()) {
                    Some(ch) => ch,
                    None => return Step::Continue,
                }
            }
            Token::Char(ch) => ch,
        };

        if !want_line {
            if !self.pending.push(ch) {
                debug!("Channel {}: pending queue full, dropping {:?}", self.id, ch);
                self.stats.queue_overflows = self.stats.queue_overflows.saturating_add(1);
            }
            return Step::Continue;
        }

        match self.framer.feed(ch) {
            Feed::Complete(line) => {
                self.stats.lines = self.stats.lines.saturating_add(1);
                Step::Line(line)
            }
            Feed::Overflow => {
                self.stats.line_overflows = self.stats.line_overflows.saturating_add(1);
                Step::Continue
            }
            Feed::Pending => Step::Continue,
        }
    }

    fn realtime_allowed(&self, cmd: RealtimeCmd, machine: &MachineSnapshot) -> bool {
        self.realtime_enabled && cmd.permitted_in(machine.state)
    }

    fn pin_event(&mut self, index: usize, active: bool) {
        match self.pins.dispatch(index, active) {
            Dispatch::Delivered => {
                self.stats.pin_events = self.stats.pin_events.saturating_add(1);
            }
            Dispatch::Failed => {
                self.stats.pin_event_failures = self.stats.pin_event_failures.saturating_add(1);
            }
            Dispatch::Ignored => {}
        }
    }

    fn auto_report(&mut self, ctx: &mut PollContext<'_>) {
        if !self.scheduler.is_enabled() {
            return;
        }
        let now = self.clock.now_ms();
        self.scheduler
            .tick(now, ctx.machine, &mut *ctx.reporter, &mut self.output);
    }

    // ── I/O-extender side ─────────────────────────────────────

    /// Register the consumer of edges on pin `index`, replacing any
    /// earlier registration.
    pub fn register_event(&mut self, index: usize, target: EventTarget) -> bool {
        self.pins.register(index, target)
    }

    /// Send an attribute message to the device behind this channel.
    ///
    /// Waits for the previous message's ACK/NAK for at most the configured
    /// number of 1 ms iterations, draining input meanwhile. On timeout the
    /// message is sent anyway.
    pub fn set_attr(
        &mut self,
        index: usize,
        value: Option<PinValue>,
        msg: &str,
        ctx: &mut PollContext<'_>,
    ) -> Result<()> {
        if let Some(value) = value {
            self.pins.bind_value(index, value);
        }

        let budget = self.ack.timeout_iterations();
        let mut waited = 0;
        while self.ack.is_pending() && waited < budget {
            self.poll(false, ctx);
            if !self.ack.is_pending() {
                break;
            }
            self.clock.delay_ms(1);
            waited += 1;
        }
        if self.ack.is_pending() {
            error!("Device not responding");
            self.stats.ack_timeouts = self.stats.ack_timeouts.saturating_add(1);
        }

        self.output.write_line(msg)?;
        self.ack.arm();
        debug!("{}", msg);
        Ok(())
    }

    /// Send a line to the device without arming the ack gate.
    pub fn out(&mut self, msg: &str) -> Result<()> {
        self.output.write_line(msg)?;
        debug!("{}", msg);
        Ok(())
    }

    // ── Host side ─────────────────────────────────────────────

    /// Answer a line: `ok`, or `error:` with a code or text.
    pub fn ack(&mut self, status: Status) -> Result<()> {
        if status.is_ok() {
            return self.output.write_line("ok");
        }
        let written = if self.verbose_errors {
            writeln!(self.output, "error:{}", status.text())
        } else {
            writeln!(self.output, "error:{}", status.code())
        };
        written.map_err(|_| Error::Transport("write failed"))
    }

    /// Print `msg` if this channel's message level admits `level`.
    pub fn print_msg(&mut self, level: MessageLevel, msg: &str) -> Result<()> {
        if self.message_level >= level {
            self.output.write_line(msg)?;
        }
        Ok(())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.output.write_bytes(data)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()
    }

    // ── Configuration ─────────────────────────────────────────

    /// Returns the interval actually applied after clamping.
    pub fn set_report_interval(&mut self, ms: u32) -> u32 {
        let now = self.clock.now_ms();
        self.scheduler.set_interval(ms, now)
    }

    pub fn report_interval(&self) -> u32 {
        self.scheduler.interval_ms()
    }

    pub fn request_wco_report(&mut self) {
        self.scheduler.request_wco_report();
    }

    pub fn request_ngc_report(&mut self, coord: CoordIndex) {
        self.scheduler.request_ngc_report(coord);
    }

    pub fn set_realtime_enabled(&mut self, enabled: bool) {
        self.realtime_enabled = enabled;
    }

    pub fn set_message_level(&mut self, level: MessageLevel) {
        self.message_level = level;
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    pub fn ack_pending(&self) -> bool {
        self.ack.is_pending()
    }

    /// Characters in the partially assembled line.
    pub fn line_len(&self) -> usize {
        self.framer.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn transport(&self) -> &T {
        self.output.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.output.transport_mut()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
