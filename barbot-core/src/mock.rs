//! Test doubles for the collaborator traits

use core::cell::Cell;

use crate::traits::{Actuator, Clock, Device, DeviceStatus, SafetyInputs};

/// Actuator that covers up to `step` positions per `run` call
#[derive(Debug, Default)]
pub struct MockActuator {
    pub position: i32,
    pub target: i32,
    pub enabled: bool,
    pub max_speed: f32,
    pub acceleration: f32,
    pub step: i32,
    pub stops: u32,
}

impl MockActuator {
    pub fn with_step(step: i32) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }
}

impl Actuator for MockActuator {
    fn set_max_speed(&mut self, steps_per_s: f32) {
        self.max_speed = steps_per_s;
    }

    fn set_acceleration(&mut self, steps_per_s2: f32) {
        self.acceleration = steps_per_s2;
    }

    fn move_to(&mut self, position: i32) {
        self.target = position;
    }

    fn run(&mut self, _now_us: u64) -> bool {
        let remaining = self.target - self.position;
        self.position += remaining.clamp(-self.step, self.step);
        self.position != self.target
    }

    fn stop(&mut self) {
        self.target = self.position;
        self.stops += 1;
    }

    fn enable_outputs(&mut self) {
        self.enabled = true;
    }

    fn disable_outputs(&mut self) {
        self.enabled = false;
    }

    fn outputs_enabled(&self) -> bool {
        self.enabled
    }

    fn current_position(&self) -> i32 {
        self.position
    }

    fn target_position(&self) -> i32 {
        self.target
    }

    fn set_current_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
    }
}

/// Device that stays busy for a fixed time after `start`
#[derive(Debug, Default)]
pub struct MockDevice {
    pub duration_ms: u32,
    pub status: DeviceStatus,
    pub started_at: u32,
    pub last_amount: Option<u16>,
    pub starts: u32,
    pub stops: u32,
    pub polls: u32,
}

impl MockDevice {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            ..Default::default()
        }
    }
}

impl Device for MockDevice {
    fn start(&mut self, amount: u16, now_ms: u32) {
        self.starts += 1;
        self.last_amount = Some(amount);
        self.started_at = now_ms;
        self.status = if amount == 0 {
            DeviceStatus::Idle
        } else {
            DeviceStatus::Busy
        };
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.status = DeviceStatus::Idle;
    }

    fn poll(&mut self, now_ms: u32) {
        self.polls += 1;
        if self.status == DeviceStatus::Busy
            && now_ms.wrapping_sub(self.started_at) >= self.duration_ms
        {
            self.status = DeviceStatus::Idle;
        }
    }

    fn status(&self) -> DeviceStatus {
        self.status
    }
}

/// Interlock inputs the test flips through shared references
#[derive(Debug)]
pub struct MockInputs {
    pub estop: Cell<bool>,
    pub limit: Cell<bool>,
    pub container: Cell<bool>,
}

impl MockInputs {
    /// Released E-stop and limit, container present
    pub fn new() -> Self {
        Self {
            estop: Cell::new(false),
            limit: Cell::new(false),
            container: Cell::new(true),
        }
    }
}

impl SafetyInputs for MockInputs {
    fn emergency_stop(&self) -> bool {
        self.estop.get()
    }

    fn limit_switch(&self) -> bool {
        self.limit.get()
    }

    fn container_present(&self) -> bool {
        self.container.get()
    }
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct MockClock {
    pub us: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.us.set(self.us.get() + ms * 1000);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.us.get()
    }
}
