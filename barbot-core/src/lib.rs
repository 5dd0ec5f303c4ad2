//! Board-agnostic core logic for the BarBot cocktail machine
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (carriage actuator, dispensing device, inputs, clock)
//! - Instruction and program model
//! - Run state machine
//! - Instruction sequencer (the control tick)
//! - Motion supervision (rail clamping, homing, limit switch)
//! - Safety monitoring logic
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod motion;
pub mod program;
pub mod registry;
pub mod safety;
pub mod sequencer;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use error::Rejected;
pub use program::{Instruction, Opcode, Program};
pub use registry::DeviceRegistry;
pub use sequencer::Sequencer;
pub use state::{Event, FaultKind, RunState};
