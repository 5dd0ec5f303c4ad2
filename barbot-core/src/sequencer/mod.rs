//! Instruction sequencer
//!
//! Runs an operator-authored program of carriage moves, dispenses, waits
//! and homing from one non-blocking control tick, with the safety
//! interlocks able to pre-empt any instruction.

pub mod executor;

pub use executor::Sequencer;
