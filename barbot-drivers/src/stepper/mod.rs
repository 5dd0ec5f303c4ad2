//! Carriage stepper drivers

pub mod step_dir;

pub use step_dir::{RampState, StepDirStepper};
