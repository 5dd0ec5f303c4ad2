//! Rejection errors
//!
//! Local, non-fatal refusals of a caller request. A rejected call never
//! changes machine state. Runtime faults are not errors in this sense; they
//! are carried by [`RunState::Fault`](crate::state::RunState::Fault).

/// Why a program edit, start or reset was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// The program cannot be edited while it is running
    Running,
    /// DISPENSE names a device id outside the registry
    InvalidDevice,
    /// Instruction capacity reached
    ProgramFull,
    /// `go` requires the machine to be idle
    NotIdle,
    /// `go` requires at least one instruction
    EmptyProgram,
    /// Recovery is vetoed while the emergency stop is held
    EmergencyStopActive,
}
