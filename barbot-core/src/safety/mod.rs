//! Safety monitoring
//!
//! Detects interlock conditions and decides when to fault.

pub mod monitor;

pub use monitor::{InputSnapshot, PresenceAction, SafetyMonitor, SafetyStatus};
