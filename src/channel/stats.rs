//! Per-channel counters.
//!
//! Every recoverable fault on the input path is counted here instead of
//! being returned; the counters are the only trace a dropped byte leaves.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Malformed multi-byte sequences.
    pub decode_errors: u32,
    /// Characters dropped because the line buffer was full.
    pub line_overflows: u32,
    /// Characters dropped because the pending queue was full.
    pub queue_overflows: u32,
    pub acks: u32,
    pub naks: u32,
    /// Attribute writes sent without the previous one being acknowledged.
    pub ack_timeouts: u32,
    /// Pin edges delivered to a registered target.
    pub pin_events: u32,
    /// Pin edges whose target failed.
    pub pin_event_failures: u32,
    pub realtime_commands: u32,
    pub lines: u32,
}
