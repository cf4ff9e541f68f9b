//! Realtime command codes and their eligibility rules.
//!
//! A realtime command is a single code acted on the moment it is
//! decoded, even halfway through a text line. Four live in the ASCII
//! range; the rest sit in U+0080..=U+00A1 and travel as two-byte UTF-8.

use crate::machine::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RealtimeCmd {
    Reset = 0x18,
    StatusReport = b'?',
    CycleStart = b'~',
    FeedHold = b'!',
    SafetyDoor = 0x84,
    JogCancel = 0x85,
    DebugReport = 0x86,
    Macro0 = 0x87,
    Macro1 = 0x88,
    Macro2 = 0x89,
    Macro3 = 0x8a,
    FeedOvrReset = 0x90,
    FeedOvrCoarsePlus = 0x91,
    FeedOvrCoarseMinus = 0x92,
    FeedOvrFinePlus = 0x93,
    FeedOvrFineMinus = 0x94,
    RapidOvrReset = 0x95,
    RapidOvrMedium = 0x96,
    RapidOvrLow = 0x97,
    RapidOvrExtraLow = 0x98,
    SpindleOvrReset = 0x99,
    SpindleOvrCoarsePlus = 0x9a,
    SpindleOvrCoarseMinus = 0x9b,
    SpindleOvrFinePlus = 0x9c,
    SpindleOvrFineMinus = 0x9d,
    SpindleOvrStop = 0x9e,
    CoolantFloodOvrToggle = 0xa0,
    CoolantMistOvrToggle = 0xa1,
}

impl RealtimeCmd {
    /// Map a decoded code to a command, `None` for anything else.
    pub fn from_code(code: u32) -> Option<Self> {
        let cmd = match code {
            0x18 => Self::Reset,
            0x3f => Self::StatusReport,
            0x7e => Self::CycleStart,
            0x21 => Self::FeedHold,
            0x84 => Self::SafetyDoor,
            0x85 => Self::JogCancel,
            0x86 => Self::DebugReport,
            0x87 => Self::Macro0,
            0x88 => Self::Macro1,
            0x89 => Self::Macro2,
            0x8a => Self::Macro3,
            0x90 => Self::FeedOvrReset,
            0x91 => Self::FeedOvrCoarsePlus,
            0x92 => Self::FeedOvrCoarseMinus,
            0x93 => Self::FeedOvrFinePlus,
            0x94 => Self::FeedOvrFineMinus,
            0x95 => Self::RapidOvrReset,
            0x96 => Self::RapidOvrMedium,
            0x97 => Self::RapidOvrLow,
            0x98 => Self::RapidOvrExtraLow,
            0x99 => Self::SpindleOvrReset,
            0x9a => Self::SpindleOvrCoarsePlus,
            0x9b => Self::SpindleOvrCoarseMinus,
            0x9c => Self::SpindleOvrFinePlus,
            0x9d => Self::SpindleOvrFineMinus,
            0x9e => Self::SpindleOvrStop,
            0xa0 => Self::CoolantFloodOvrToggle,
            0xa1 => Self::CoolantMistOvrToggle,
            _ => return None,
        };
        Some(cmd)
    }

    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Whether the command may run in `state`.
    ///
    /// Sleep and the configuration/critical alarms accept only reset and
    /// the two report queries. A plain alarm additionally refuses anything
    /// that would start motion.
    pub fn permitted_in(self, state: RunState) -> bool {
        match state {
            RunState::Sleep | RunState::ConfigAlarm | RunState::Critical => matches!(
                self,
                Self::Reset | Self::StatusReport | Self::DebugReport
            ),
            RunState::Alarm => !matches!(
                self,
                Self::CycleStart | Self::Macro0 | Self::Macro1 | Self::Macro2 | Self::Macro3
            ),
            _ => true,
        }
    }
}
