//! Events that trigger state transitions

use super::machine::FaultKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Caller events
    /// `go` with a container present
    Start,
    /// `go` without a container present
    AwaitContainer,
    /// Recovery request; carries the emergency stop level at the time
    Reset { emergency_stop: bool },

    // Sequencer events
    /// Container detected while waiting
    ContainerArrived,
    /// Cursor moved past the last instruction
    ProgramFinished,

    // Safety events
    /// Something forced the machine to halt
    FaultRaised(FaultKind),
}
