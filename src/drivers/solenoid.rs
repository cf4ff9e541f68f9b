//! Solenoid axis driver.
//!
//! Drives a single digital output from the position of one axis: the
//! solenoid is energised while the axis sits on the positive side of
//! zero (negative side with `direction_invert`). Typical use is a pen or
//! drag-knife lift on a plotter.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::digital::OutputPin`, so the same driver
//! runs on an ESP-IDF `PinDriver` or on a host mock.

use embedded_hal::digital::{OutputPin, PinState};
use log::{info, trace, warn};

use crate::app::ports::MotorDriver;

/// Update cadence expected from the motion loop.
pub const UPDATE_RATE_MS: u32 = 20;

pub struct HwSolenoid<P: OutputPin> {
    axis: usize,
    output: Option<P>,
    dir_invert: bool,
    has_errors: bool,
    is_on: bool,
}

impl<P: OutputPin> HwSolenoid<P> {
    /// `output` may be `None` when the pin is not configured; `init`
    /// then latches an error and the driver stays inert.
    pub fn new(axis: usize, output: Option<P>, dir_invert: bool) -> Self {
        Self {
            axis,
            output,
            dir_invert,
            has_errors: false,
            is_on: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    fn wants_on(&self, mpos: f32) -> bool {
        if self.dir_invert {
            mpos < 0.0
        } else {
            mpos > 0.0
        }
    }
}

impl<P: OutputPin> MotorDriver for HwSolenoid<P> {
    fn name(&self) -> &'static str {
        "hwsolenoid"
    }

    fn init(&mut self) {
        if self.output.is_none() {
            warn!("    HwSolenoid disabled: No output pin");
            self.has_errors = true;
            return;
        }
        info!(
            "    {} axis {} Direction Invert: {}",
            self.name(),
            self.axis,
            self.dir_invert
        );
    }

    fn update(&mut self, mpos: &[f32]) {
        if self.has_errors {
            return;
        }
        let Some(&pos) = mpos.get(self.axis) else {
            warn!("HwSolenoid: no position for axis {}", self.axis);
            return;
        };
        let on = self.wants_on(pos);
        let Some(pin) = self.output.as_mut() else {
            return;
        };
        if pin.set_state(PinState::from(on)).is_err() {
            warn!("HwSolenoid: output write failed");
            return;
        }
        if on != self.is_on {
            trace!("HwSolenoid: is_solenoid_on: {}", on);
        }
        self.is_on = on;
    }

    /// The solenoid has no enable line.
    fn set_disable(&mut self, _disable: bool) {}
}
