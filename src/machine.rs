//! Read-only machine state consumed by the channel.
//!
//! The motion/G-code interpreter owns the real state. Once per poll it
//! hands the channel a [`MachineSnapshot`], which the realtime eligibility
//! check and the auto-report scheduler diff against their cached copies.

/// Controller run state, as shown in status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Alarm,
    CheckMode,
    Homing,
    Cycle,
    Hold,
    Jog,
    SafetyDoor,
    Sleep,
    ConfigAlarm,
    Critical,
}

impl RunState {
    /// States in which the machine is producing motion. Periodic status
    /// reports are only scheduled while moving.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Cycle | Self::Homing | Self::Jog)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Seek,
    Linear,
    CwArc,
    CcwArc,
    ProbeToward,
    ProbeTowardNoError,
    ProbeAway,
    ProbeAwayNoError,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedMode {
    #[default]
    UnitsPerMin,
    InverseTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Mm,
    Inches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distance {
    #[default]
    Absolute,
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plane {
    #[default]
    XY,
    ZX,
    YZ,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpindleState {
    #[default]
    Disable,
    Cw,
    Ccw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coolant {
    pub mist: bool,
    pub flood: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramFlow {
    #[default]
    Running,
    Paused,
    OptionalStop,
    CompletedM2,
    CompletedM30,
}

/// Named coordinate systems and stored positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordIndex {
    #[default]
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
    G28,
    G30,
    G92,
    Tlo,
}

/// Persistent G-code mode settings, compared snapshot-to-snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    pub motion: Motion,
    pub feed: FeedMode,
    pub units: Units,
    pub distance: Distance,
    pub plane: Plane,
    pub coord_select: CoordIndex,
    pub spindle: SpindleState,
    pub coolant: Coolant,
    pub program_flow: ProgramFlow,
}

/// Everything the channel reads from the interpreter in one poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MachineSnapshot {
    pub state: RunState,
    pub modal: ModalState,
    pub tool: u32,
    pub spindle_speed: u32,
    pub feed_rate: f32,
    /// Probe input currently triggered.
    pub probe: bool,
}
