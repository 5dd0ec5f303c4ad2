//! Run state machine
//!
//! Which sequencer operations are legal is a function of the current state.
//! Side effects of a transition (halting the carriage, stopping devices)
//! are performed by the sequencer; this module only decides the next state.

use super::events::Event;

/// Authoritative machine mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Accepting edits, able to start
    #[default]
    Idle,
    /// Started, but blocked until a container is present
    Waiting,
    /// Executing the program
    Running,
    /// Halted; only a reset leaves this state
    Fault(FaultKind),
}

/// Why the machine faulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Emergency stop line asserted
    EmergencyStop,
    /// Limit switch hit outside a homing move
    LimitSwitch,
    /// MOVE did not arrive within the move timeout
    MoveTimeout,
    /// ZERO reached its target without the limit switch firing
    HomingOvershoot,
    /// ZERO did not find the limit switch within the move timeout
    HomingTimeout,
    /// Container removed while running
    ContainerRemoved,
    /// Fault requested by the caller (explicit fault or reset)
    Requested,
}

impl RunState {
    /// Check if program edits are allowed
    pub fn accepts_edits(&self) -> bool {
        !matches!(self, RunState::Running)
    }

    /// Check if this is a fault state
    pub fn is_fault(&self) -> bool {
        matches!(self, RunState::Fault(_))
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// The latched fault, if any
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            RunState::Fault(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// Events that are not legal in the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use RunState::*;

        match (self, event) {
            // The first fault kind is kept until reset
            (Fault(kind), FaultRaised(_)) => Fault(kind),
            (_, FaultRaised(kind)) => Fault(kind),

            (Idle, Start) => Running,
            (Idle, AwaitContainer) => Waiting,

            (Waiting, ContainerArrived) => Running,

            (Running, ProgramFinished) => Idle,

            // Recovery is vetoed while the emergency stop is held
            (Fault(_), Reset { emergency_stop: false }) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_paths() {
        assert_eq!(RunState::Idle.transition(Event::Start), RunState::Running);
        assert_eq!(
            RunState::Idle.transition(Event::AwaitContainer),
            RunState::Waiting
        );
        assert_eq!(
            RunState::Waiting.transition(Event::ContainerArrived),
            RunState::Running
        );
    }

    #[test]
    fn test_start_ignored_unless_idle() {
        assert_eq!(RunState::Running.transition(Event::Start), RunState::Running);
        assert_eq!(RunState::Waiting.transition(Event::Start), RunState::Waiting);
        let fault = RunState::Fault(FaultKind::LimitSwitch);
        assert_eq!(fault.transition(Event::Start), fault);
    }

    #[test]
    fn test_fault_from_any_state() {
        let states = [RunState::Idle, RunState::Waiting, RunState::Running];

        for state in states {
            let next = state.transition(Event::FaultRaised(FaultKind::EmergencyStop));
            assert_eq!(next, RunState::Fault(FaultKind::EmergencyStop));
        }
    }

    #[test]
    fn test_fault_kind_is_sticky() {
        let state = RunState::Fault(FaultKind::MoveTimeout);
        let next = state.transition(Event::FaultRaised(FaultKind::EmergencyStop));
        assert_eq!(next.fault_kind(), Some(FaultKind::MoveTimeout));
    }

    #[test]
    fn test_reset_vetoed_by_emergency_stop() {
        let state = RunState::Fault(FaultKind::EmergencyStop);
        assert_eq!(
            state.transition(Event::Reset {
                emergency_stop: true
            }),
            state
        );
        assert_eq!(
            state.transition(Event::Reset {
                emergency_stop: false
            }),
            RunState::Idle
        );
    }

    #[test]
    fn test_only_reset_leaves_fault() {
        let state = RunState::Fault(FaultKind::ContainerRemoved);
        for event in [
            Event::Start,
            Event::AwaitContainer,
            Event::ContainerArrived,
            Event::ProgramFinished,
        ] {
            assert!(state.transition(event).is_fault());
        }
    }

    #[test]
    fn test_program_finished_returns_to_idle() {
        assert_eq!(
            RunState::Running.transition(Event::ProgramFinished),
            RunState::Idle
        );
    }

    #[test]
    fn test_edit_gate() {
        assert!(RunState::Idle.accepts_edits());
        assert!(RunState::Waiting.accepts_edits());
        assert!(RunState::Fault(FaultKind::Requested).accepts_edits());
        assert!(!RunState::Running.accepts_edits());
    }
}
