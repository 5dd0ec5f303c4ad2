//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in barbot-core:
//!
//! - Dispensing devices (optic, mixer, dasher, syringe, conveyor, slice,
//!   stirrer, umbrella) behind one [`Dispenser`] enum
//! - Step/dir carriage stepper with a trapezoidal speed ramp
//! - Pin-backed safety inputs
//! - Config-driven construction from a [`PinBank`]

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod dispenser;
pub mod interlock;
pub mod stepper;

#[cfg(test)]
pub(crate) mod mock;

pub use board::{
    build_carriage, build_device, build_interlocks, build_registry, BoardDispenser, BuildError,
    PinBank, PinError,
};
pub use dispenser::Dispenser;
pub use interlock::PinSafetyInputs;
pub use stepper::StepDirStepper;
