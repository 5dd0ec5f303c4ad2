//! Carriage motion
//!
//! Rail clamping, homing and limit switch interpretation on top of a
//! target-position actuator.

pub mod supervisor;

pub use supervisor::{LimitEvent, MotionSupervisor, MoveRefused, SpeedProfile};
