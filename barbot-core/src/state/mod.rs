//! State machine for program execution
//!
//! Defines the authoritative run mode of the machine.
//! The state machine is explicit, finite, and deterministic.

pub mod machine;
pub mod events;

pub use machine::{FaultKind, RunState};
pub use events::Event;
