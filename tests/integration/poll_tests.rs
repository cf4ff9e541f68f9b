//! Integration tests for the poll path: framing, realtime interception,
//! pending queue and malformed input.

use crate::mock_io::Harness;

use cncmux::ChannelConfig;
use cncmux::channel::codec::Token;
use cncmux::channel::line::MAX_LINE_LEN;
use cncmux::channel::pending::PENDING_CAPACITY;
use cncmux::channel::realtime::RealtimeCmd;
use cncmux::machine::RunState;

fn harness() -> Harness {
    Harness::new(&ChannelConfig::default())
}

// ── Framing ───────────────────────────────────────────────────

#[test]
fn mixed_line_endings_yield_one_line_each() {
    let mut h = harness();
    h.feed(b"G0 X0\rG1 X1\nG2 X2\r\nG3 X3\n");
    assert_eq!(h.lines(), ["G0 X0", "G1 X1", "G2 X2", "G3 X3"]);
}

#[test]
fn crlf_split_across_polls_is_one_ending() {
    let mut h = harness();
    h.feed(b"G1\r");
    assert_eq!(h.poll(true).as_deref(), Some("G1"));
    assert_eq!(h.poll(true), None);

    h.feed(b"\nG2\n");
    assert_eq!(h.lines(), ["G2"]);
}

#[test]
fn backspace_edits_the_line() {
    let mut h = harness();
    h.feed(b"\x08G1 X5\x08\x086\n");
    assert_eq!(h.lines(), ["G1 6"]);
}

#[test]
fn line_at_capacity_completes_and_excess_is_dropped() {
    let mut h = harness();
    let exact = "A".repeat(MAX_LINE_LEN);
    h.feed(exact.as_bytes());
    h.feed(b"\n");
    assert_eq!(h.lines(), [exact.clone()]);
    assert_eq!(h.channel.stats().line_overflows, 0);

    h.feed(exact.as_bytes());
    h.feed(b"BCD\nnext\n");
    assert_eq!(h.lines(), [exact, "next".to_owned()]);
    assert_eq!(h.channel.stats().line_overflows, 3);
}

#[test]
fn multibyte_text_is_kept() {
    let mut h = harness();
    h.feed("(Düsenöl)\n".as_bytes());
    assert_eq!(h.lines(), ["(Düsenöl)"]);
}

// ── Realtime ──────────────────────────────────────────────────

#[test]
fn realtime_mid_line_dispatches_without_touching_the_line() {
    let mut h = harness();
    h.machine.state = RunState::Cycle;
    h.feed(b"G1 X1");
    h.feed_token(Token::Realtime(RealtimeCmd::FeedHold));
    assert_eq!(h.poll(true), None);
    assert_eq!(h.executor.commands(), [RealtimeCmd::FeedHold]);
    assert_eq!(h.channel.line_len(), 5);

    h.feed(b"0\n");
    assert_eq!(h.lines(), ["G1 X10"]);
}

#[test]
fn realtime_carries_channel_identity() {
    let mut h = harness();
    h.feed(b"?");
    h.poll(true);
    assert_eq!(h.executor.calls.len(), 1);
    assert_eq!(h.executor.calls[0].1, h.channel.id());
    assert_eq!(h.take_output(), "<Idle>\n");
}

#[test]
fn two_byte_realtime_split_across_polls() {
    let mut h = harness();
    h.machine.state = RunState::Jog;
    h.feed(&[0xc2]);
    assert_eq!(h.poll(true), None);
    assert!(h.executor.calls.is_empty());

    h.feed(&[0x85]);
    assert_eq!(h.poll(true), None);
    assert_eq!(h.executor.commands(), [RealtimeCmd::JogCancel]);
    assert_eq!(h.channel.stats().decode_errors, 0);
}

#[test]
fn realtime_rejected_by_state_becomes_text() {
    let mut h = harness();
    h.machine.state = RunState::Alarm;
    h.feed(b"~\n");
    assert_eq!(h.lines(), ["~"]);
    assert!(h.executor.calls.is_empty());

    // Reset is always accepted.
    h.feed_token(Token::Realtime(RealtimeCmd::Reset));
    h.poll(true);
    assert_eq!(h.executor.commands(), [RealtimeCmd::Reset]);
}

#[test]
fn parked_realtime_code_is_rechecked_when_dequeued() {
    let mut h = harness();
    h.machine.state = RunState::Alarm;
    h.feed(b"G~1\n");
    assert_eq!(h.poll(false), None);
    assert!(h.executor.calls.is_empty());
    assert_eq!(h.channel.pending_len(), 4);

    h.machine.state = RunState::Idle;
    assert_eq!(h.lines(), ["G1"]);
    assert_eq!(h.executor.commands(), [RealtimeCmd::CycleStart]);
}

#[test]
fn realtime_disabled_channel_treats_codes_as_text() {
    let config = ChannelConfig {
        realtime_enabled: false,
        ..ChannelConfig::default()
    };
    let mut h = Harness::new(&config);
    h.feed(b"$J=X1!\n");
    assert_eq!(h.lines(), ["$J=X1!"]);
    assert!(h.executor.calls.is_empty());

    h.channel.set_realtime_enabled(true);
    h.feed(b"!");
    h.poll(true);
    assert_eq!(h.executor.commands(), [RealtimeCmd::FeedHold]);
}

// ── Pending queue ─────────────────────────────────────────────

#[test]
fn events_only_poll_parks_text_in_order() {
    let mut h = harness();
    h.feed(b"G1\n");
    h.feed_token(Token::Realtime(RealtimeCmd::StatusReport));
    h.feed(b"G2\n");

    assert_eq!(h.poll(false), None);
    assert_eq!(h.executor.commands(), [RealtimeCmd::StatusReport]);
    assert_eq!(h.channel.pending_len(), 6);

    assert_eq!(h.lines(), ["G1", "G2"]);
    assert_eq!(h.channel.pending_len(), 0);
}

#[test]
fn queued_text_comes_before_new_input() {
    let mut h = harness();
    h.feed(b"G1 ");
    h.poll(false);
    h.feed(b"X2\n");
    assert_eq!(h.lines(), ["G1 X2"]);
}

#[test]
fn full_pending_queue_drops_newest() {
    let mut h = harness();
    let text = "x".repeat(PENDING_CAPACITY + 44);
    h.feed(text.as_bytes());
    h.poll(false);
    assert_eq!(h.channel.pending_len(), PENDING_CAPACITY);
    assert_eq!(h.channel.stats().queue_overflows, 44);
}

// ── Malformed input ───────────────────────────────────────────

#[test]
fn malformed_bytes_are_skipped() {
    let mut h = harness();
    h.feed(&[0xff, 0x80]);
    h.feed(b"G1\n");
    assert_eq!(h.lines(), ["G1"]);
    assert_eq!(h.channel.stats().decode_errors, 2);
}

#[test]
fn truncated_sequence_consumes_interrupting_byte() {
    let mut h = harness();
    // 0xC3 expects a continuation; 'A' interrupts it and is lost.
    h.feed(&[0xc3]);
    h.feed(b"AB\n");
    assert_eq!(h.lines(), ["B"]);
    assert_eq!(h.channel.stats().decode_errors, 1);
}

#[test]
fn flush_rx_discards_everything_buffered() {
    let mut h = harness();
    h.feed(b"G1 X");
    h.poll(true);
    h.feed(b"junk");
    h.poll(false);
    assert_eq!(h.channel.line_len(), 4);
    assert_eq!(h.channel.pending_len(), 4);

    h.channel.flush_rx();
    assert_eq!(h.channel.line_len(), 0);
    assert_eq!(h.channel.pending_len(), 0);

    h.feed(b"M5\n");
    assert_eq!(h.lines(), ["M5"]);
}
