//! Collaborator boundary.
//!
//! The channel core talks to the interpreter, the report renderers,
//! I/O-extender consumers and motor drivers only through the **port
//! traits** defined in [`ports`].

pub mod ports;
