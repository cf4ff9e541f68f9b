//! Line status codes acknowledged back to the sender.
//!
//! The numeric values are the ones G-code senders already understand
//! (`error:20` and friends), so they must never be renumbered.

use core::fmt;

/// Outcome of executing one received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    ExpectedCommandLetter = 1,
    BadNumberFormat = 2,
    InvalidStatement = 3,
    NegativeValue = 4,
    SettingDisabled = 5,
    SettingStepPulseMin = 6,
    SettingReadFail = 7,
    IdleError = 8,
    SystemGcLock = 9,
    SoftLimitError = 10,
    Overflow = 11,
    MaxStepRateExceeded = 12,
    CheckDoor = 13,
    LineLengthExceeded = 14,
    TravelExceeded = 15,
    InvalidJogCommand = 16,
    SettingDisabledLaser = 17,
    HomingNoCycles = 18,
    GcodeUnsupportedCommand = 20,
    GcodeModalGroupViolation = 21,
    GcodeUndefinedFeedRate = 22,
    GcodeCommandValueNotInteger = 23,
    GcodeAxisCommandConflict = 24,
    GcodeWordRepeated = 25,
    GcodeNoAxisWords = 26,
    GcodeInvalidLineNumber = 27,
    GcodeValueWordMissing = 28,
    GcodeUnsupportedCoordSys = 29,
    GcodeG53InvalidMotionMode = 30,
    GcodeAxisWordsExist = 31,
    GcodeNoAxisWordsInPlane = 32,
    GcodeInvalidTarget = 33,
    GcodeArcRadiusError = 34,
    GcodeNoOffsetsInPlane = 35,
    GcodeUnusedWords = 36,
    GcodeG43DynamicAxisError = 37,
    GcodeMaxValueExceeded = 38,
}

impl Status {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Human-readable text used when verbose errors are enabled.
    pub fn text(self) -> &'static str {
        match self {
            Self::Ok => "No error",
            Self::ExpectedCommandLetter => "Expected GCode command letter",
            Self::BadNumberFormat => "Bad GCode number format",
            Self::InvalidStatement => "Invalid $ statement",
            Self::NegativeValue => "Negative value",
            Self::SettingDisabled => "Setting disabled",
            Self::SettingStepPulseMin => "Step pulse too short",
            Self::SettingReadFail => "Failed to read settings",
            Self::IdleError => "Command requires idle state",
            Self::SystemGcLock => "GCode cannot be executed in lock or alarm state",
            Self::SoftLimitError => "Soft limit error",
            Self::Overflow => "Line too long",
            Self::MaxStepRateExceeded => "Max step rate exceeded",
            Self::CheckDoor => "Check door",
            Self::LineLengthExceeded => "Startup line too long",
            Self::TravelExceeded => "Max travel exceeded during jog",
            Self::InvalidJogCommand => "Invalid jog command",
            Self::SettingDisabledLaser => "Laser mode requires PWM output",
            Self::HomingNoCycles => "No Homing/Cycle defined in settings",
            Self::GcodeUnsupportedCommand => "Unsupported GCode command",
            Self::GcodeModalGroupViolation => "Gcode modal group violation",
            Self::GcodeUndefinedFeedRate => "Gcode undefined feed rate",
            Self::GcodeCommandValueNotInteger => "Gcode command value not integer",
            Self::GcodeAxisCommandConflict => "Gcode axis command conflict",
            Self::GcodeWordRepeated => "Gcode word repeated",
            Self::GcodeNoAxisWords => "Gcode no axis words",
            Self::GcodeInvalidLineNumber => "Gcode invalid line number",
            Self::GcodeValueWordMissing => "Gcode value word missing",
            Self::GcodeUnsupportedCoordSys => "Gcode unsupported coordinate system",
            Self::GcodeG53InvalidMotionMode => "Gcode G53 invalid motion mode",
            Self::GcodeAxisWordsExist => "Gcode extra axis words",
            Self::GcodeNoAxisWordsInPlane => "Gcode no axis words in plane",
            Self::GcodeInvalidTarget => "Gcode invalid target",
            Self::GcodeArcRadiusError => "Gcode arc radius error",
            Self::GcodeNoOffsetsInPlane => "Gcode no offsets in plane",
            Self::GcodeUnusedWords => "Gcode unused words",
            Self::GcodeG43DynamicAxisError => "Gcode G43 dynamic axis error",
            Self::GcodeMaxValueExceeded => "Gcode max value exceeded",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
