//! Integration tests for flow-controlled attribute writes.

use crate::mock_io::Harness;

use cncmux::ChannelConfig;
use cncmux::channel::codec::Token;
use cncmux::channel::realtime::RealtimeCmd;

fn harness() -> Harness {
    Harness::new(&ChannelConfig::default())
}

#[test]
fn first_write_goes_out_immediately() {
    let mut h = harness();
    h.set_attr(0, None, "[ESP:io.0=out]").unwrap();
    assert_eq!(h.now_ms(), 0);
    assert!(h.channel.ack_pending());
    assert_eq!(h.take_output(), "[ESP:io.0=out]\n");
}

#[test]
fn second_write_waits_for_ack() {
    let mut h = harness();
    h.set_attr(0, None, "first").unwrap();
    h.schedule_token(10, Token::Ack);

    h.set_attr(1, None, "second").unwrap();
    let now = h.now_ms();
    assert!((10..=11).contains(&now), "waited {}ms", now);
    assert_eq!(h.channel.stats().acks, 1);
    assert_eq!(h.channel.stats().ack_timeouts, 0);
    assert_eq!(h.take_output(), "first\nsecond\n");
    assert!(h.channel.ack_pending());
}

#[test]
fn nak_also_releases_the_gate() {
    let mut h = harness();
    h.set_attr(0, None, "bad").unwrap();
    h.schedule_token(3, Token::Nak);
    h.set_attr(0, None, "retry").unwrap();
    assert!(h.now_ms() <= 4);
    assert_eq!(h.channel.stats().naks, 1);
    assert_eq!(h.channel.stats().ack_timeouts, 0);
}

#[test]
fn silent_device_times_out_and_write_proceeds() {
    let mut h = harness();
    h.set_attr(0, None, "a").unwrap();
    h.set_attr(0, None, "b").unwrap();
    assert_eq!(h.now_ms(), ChannelConfig::default().ack_timeout_ms);
    assert_eq!(h.channel.stats().ack_timeouts, 1);
    assert_eq!(h.take_output(), "a\nb\n");
}

#[test]
fn configured_timeout_bounds_the_wait() {
    let config = ChannelConfig {
        ack_timeout_ms: 5,
        ..ChannelConfig::default()
    };
    let mut h = Harness::new(&config);
    h.set_attr(0, None, "a").unwrap();
    h.set_attr(0, None, "b").unwrap();
    h.set_attr(0, None, "c").unwrap();
    assert_eq!(h.now_ms(), 10);
    assert_eq!(h.channel.stats().ack_timeouts, 2);
}

#[test]
fn input_keeps_flowing_while_waiting() {
    let mut h = harness();
    h.set_attr(0, None, "first").unwrap();
    h.feed(b"G1 X1\n");
    h.feed_token(Token::Realtime(RealtimeCmd::StatusReport));
    h.schedule_token(2, Token::Ack);

    h.set_attr(0, None, "second").unwrap();
    assert_eq!(h.executor.commands(), [RealtimeCmd::StatusReport]);
    // The line arrived while only events were wanted; it is still there.
    assert_eq!(h.lines(), ["G1 X1"]);
}

#[test]
fn plain_out_does_not_arm_the_gate() {
    let mut h = harness();
    h.channel.out("[ESP:io.*]").unwrap();
    assert!(!h.channel.ack_pending());
    h.channel.out("again").unwrap();
    assert_eq!(h.now_ms(), 0);
    assert_eq!(h.take_output(), "[ESP:io.*]\nagain\n");
}

#[test]
fn stray_ack_is_harmless() {
    let mut h = harness();
    h.feed_token(Token::Ack);
    h.poll(true);
    assert!(!h.channel.ack_pending());
    assert_eq!(h.channel.stats().acks, 1);
}
