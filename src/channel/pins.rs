//! Pin event registry.
//!
//! Maps an I/O-extender pin index to the event target that consumes its
//! edges and to the boolean cell mirroring its level. Both are owned by
//! the subsystem that registered them; the registry holds `Weak` handles
//! and never keeps them alive. A dropped owner behaves like an index
//! that was never registered.

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::app::ports::EventPin;
use crate::channel::codec::PIN_EVENT_SLOTS;

/// Handle to an externally owned event target.
pub type EventTarget = Weak<RefCell<dyn EventPin>>;

/// Handle to an externally owned pin-level mirror.
pub type PinValue = Weak<Cell<bool>>;

/// Result of one dispatch, for accounting by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No live target for the index.
    Ignored,
    Delivered,
    /// The target was busy or returned an error; the edge was dropped.
    Failed,
}

pub struct PinEventRegistry {
    targets: [Option<EventTarget>; PIN_EVENT_SLOTS],
    values: [Option<PinValue>; PIN_EVENT_SLOTS],
}

impl Default for PinEventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PinEventRegistry {
    pub fn new() -> Self {
        Self {
            targets: core::array::from_fn(|_| None),
            values: core::array::from_fn(|_| None),
        }
    }

    /// Register the target for `index`, replacing any earlier one.
    /// Returns `false` for an index outside the addressable range.
    pub fn register(&mut self, index: usize, target: EventTarget) -> bool {
        match self.targets.get_mut(index) {
            Some(slot) => {
                if slot.is_some() {
                    debug!("PinEvents: replacing target for pin {}", index);
                }
                *slot = Some(target);
                true
            }
            None => {
                warn!("PinEvents: pin index {} out of range", index);
                false
            }
        }
    }

    /// Bind the level mirror for `index`, replacing any earlier one.
    pub fn bind_value(&mut self, index: usize, value: PinValue) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => {
                warn!("PinEvents: pin index {} out of range", index);
                false
            }
        }
    }

    pub fn is_registered(&self, index: usize) -> bool {
        self.target(index).is_some()
    }

    /// Deliver an edge: mirror the level, then trigger the target.
    ///
    /// Unregistered indices are a silent no-op. Target failures stop here.
    pub fn dispatch(&mut self, index: usize, active: bool) -> Dispatch {
        let Some(target) = self.target(index) else {
            return Dispatch::Ignored;
        };

        if let Some(value) = self.values[index].as_ref().and_then(Weak::upgrade) {
            value.set(active);
        }

        let Ok(mut pin) = target.try_borrow_mut() else {
            warn!("PinEvents: target for pin {} is busy, edge dropped", index);
            return Dispatch::Failed;
        };
        match pin.trigger(active) {
            Ok(()) => Dispatch::Delivered,
            Err(e) => {
                warn!("PinEvents: {} (pin {}) failed: {}", pin.name(), index, e);
                Dispatch::Failed
            }
        }
    }

    fn target(&self, index: usize) -> Option<Rc<RefCell<dyn EventPin>>> {
        self.targets.get(index)?.as_ref()?.upgrade()
    }
}
