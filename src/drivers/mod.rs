//! Motor drivers built on top of a channel.

pub mod solenoid;
