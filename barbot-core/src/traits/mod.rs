//! Collaborator traits
//!
//! These traits define the interface between the sequencer and the
//! hardware-specific implementations it drives.

pub mod actuator;
pub mod clock;
pub mod device;
pub mod inputs;

pub use actuator::Actuator;
pub use clock::{elapsed_ms, Clock};
pub use device::{Device, DeviceStatus};
pub use inputs::SafetyInputs;
