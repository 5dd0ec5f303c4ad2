//! Safety monitor implementation
//!
//! Samples the emergency stop, limit switch and container sensor once per
//! tick and decides which interlock, if any, must act.

use crate::config::SafetyConfig;
use crate::state::{FaultKind, RunState};
use crate::traits::SafetyInputs;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Safety condition violated
    Fault(FaultKind),
}

/// What the container sensor means for the sequencer this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresenceAction {
    /// Nothing to do
    Hold,
    /// Waiting and a container arrived: start the program
    Begin,
    /// Running and the container was removed: fault
    Abort,
}

/// Input levels for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    pub emergency_stop: bool,
    pub limit_switch: bool,
    pub container_present: bool,
}

/// Safety monitor for interlock evaluation
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    config: SafetyConfig,
    last: InputSnapshot,
}

impl SafetyMonitor {
    /// Create a new safety monitor
    pub fn new(config: SafetyConfig) -> Self {
        Self {
            config,
            last: InputSnapshot::default(),
        }
    }

    /// Read every input once
    ///
    /// All decisions for a tick are made against this snapshot.
    pub fn sample<I: SafetyInputs>(&mut self, inputs: &I) -> InputSnapshot {
        self.last = InputSnapshot {
            emergency_stop: inputs.emergency_stop(),
            limit_switch: inputs.limit_switch(),
            container_present: self.container_present(inputs),
        };
        self.last
    }

    /// Container presence, honouring the sensing switch
    pub fn container_present<I: SafetyInputs>(&self, inputs: &I) -> bool {
        !self.config.container_sensing || inputs.container_present()
    }

    /// Check the emergency stop against the current state
    ///
    /// Reports a fault only on entry; an already faulted machine stays as is.
    pub fn check(&self, state: RunState) -> SafetyStatus {
        if self.last.emergency_stop && !state.is_fault() {
            return SafetyStatus::Fault(FaultKind::EmergencyStop);
        }
        SafetyStatus::Ok
    }

    /// Evaluate the container gate for the current state
    pub fn presence(&self, state: RunState) -> PresenceAction {
        match state {
            RunState::Waiting if self.last.container_present => PresenceAction::Begin,
            RunState::Running if !self.last.container_present => PresenceAction::Abort,
            _ => PresenceAction::Hold,
        }
    }

    /// Most recent snapshot
    pub fn last(&self) -> InputSnapshot {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockInputs;

    fn monitor() -> SafetyMonitor {
        SafetyMonitor::new(SafetyConfig::default())
    }

    #[test]
    fn test_normal_inputs_ok() {
        let inputs = MockInputs::new();
        let mut monitor = monitor();
        monitor.sample(&inputs);
        assert_eq!(monitor.check(RunState::Running), SafetyStatus::Ok);
        assert_eq!(monitor.presence(RunState::Running), PresenceAction::Hold);
    }

    #[test]
    fn test_emergency_stop_faults_any_state() {
        let inputs = MockInputs::new();
        inputs.estop.set(true);
        let mut monitor = monitor();
        monitor.sample(&inputs);

        for state in [RunState::Idle, RunState::Waiting, RunState::Running] {
            assert_eq!(
                monitor.check(state),
                SafetyStatus::Fault(FaultKind::EmergencyStop)
            );
        }
        assert_eq!(
            monitor.check(RunState::Fault(FaultKind::Requested)),
            SafetyStatus::Ok
        );
    }

    #[test]
    fn test_presence_gate() {
        let inputs = MockInputs::new();
        let mut monitor = monitor();

        inputs.container.set(false);
        monitor.sample(&inputs);
        assert_eq!(monitor.presence(RunState::Waiting), PresenceAction::Hold);
        assert_eq!(monitor.presence(RunState::Running), PresenceAction::Abort);
        assert_eq!(monitor.presence(RunState::Idle), PresenceAction::Hold);

        inputs.container.set(true);
        monitor.sample(&inputs);
        assert_eq!(monitor.presence(RunState::Waiting), PresenceAction::Begin);
        assert_eq!(monitor.presence(RunState::Running), PresenceAction::Hold);
    }

    #[test]
    fn test_sensing_disabled_reports_present() {
        let inputs = MockInputs::new();
        inputs.container.set(false);
        let mut monitor = SafetyMonitor::new(SafetyConfig {
            container_sensing: false,
        });

        let snapshot = monitor.sample(&inputs);
        assert!(snapshot.container_present);
        assert!(monitor.container_present(&inputs));
        assert_eq!(monitor.presence(RunState::Running), PresenceAction::Hold);
    }

    #[test]
    fn test_snapshot_records_levels() {
        let inputs = MockInputs::new();
        inputs.limit.set(true);
        let mut monitor = monitor();
        let snapshot = monitor.sample(&inputs);
        assert!(snapshot.limit_switch);
        assert!(!snapshot.emergency_stop);
        assert_eq!(monitor.last(), snapshot);
    }
}
