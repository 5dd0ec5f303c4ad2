//! Carriage motion supervision
//!
//! Wraps the carriage [`Actuator`] with the rules the rest of the machine
//! relies on: MOVE targets never exceed the rail end, homing runs at its own
//! speed toward a point beyond the limit switch, and a limit switch hit is
//! classified as either a successful home or an unexpected collision.

use crate::config::MotionConfig;
use crate::traits::{elapsed_ms, Actuator};

/// Speed profile selected before a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedProfile {
    /// Traverse speed used by MOVE
    Normal,
    /// Slow speed used by ZERO
    Homing,
}

/// Result of interpreting the limit switch for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitEvent {
    /// Switch released, or asserted just after a move off it
    Clear,
    /// Switch reached while homing or at the far rail end; position pinned
    Homed,
    /// Switch reached by any other move; carriage halted
    Unexpected,
}

/// Move refused because the emergency stop is asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveRefused;

/// Supervised carriage
#[derive(Debug)]
pub struct MotionSupervisor<A> {
    actuator: A,
    config: MotionConfig,
    /// Last target handed to the actuator, after clamping
    commanded: i32,
    move_start_ms: u32,
}

impl<A: Actuator> MotionSupervisor<A> {
    /// Take ownership of the actuator and park it de-energized
    pub fn new(mut actuator: A, config: MotionConfig) -> Self {
        actuator.set_max_speed(config.normal_speed);
        actuator.set_acceleration(config.acceleration);
        actuator.disable_outputs();

        Self {
            actuator,
            config,
            commanded: 0,
            move_start_ms: 0,
        }
    }

    /// Select the speed for subsequent moves
    pub fn set_profile(&mut self, profile: SpeedProfile) {
        let speed = match profile {
            SpeedProfile::Normal => self.config.normal_speed,
            SpeedProfile::Homing => self.config.homing_speed,
        };
        self.actuator.set_max_speed(speed);
    }

    /// Command a move
    ///
    /// # Arguments
    /// * `position` - Requested rail position
    /// * `force` - Skip clamping to the rail end (homing only)
    /// * `emergency_stop` - Current E-stop level; an asserted E-stop halts
    ///   the carriage instead of moving it
    /// * `now_ms` - Move start timestamp
    ///
    /// # Returns
    /// The target actually commanded
    pub fn move_to(
        &mut self,
        position: i32,
        force: bool,
        emergency_stop: bool,
        now_ms: u32,
    ) -> Result<i32, MoveRefused> {
        if emergency_stop {
            warn!("move refused: emergency stop");
            self.halt();
            return Err(MoveRefused);
        }

        let target = if force {
            position
        } else {
            self.config.clamp(position)
        };
        if target != position {
            warn!("move clamped to rail end: {} -> {}", position, target);
        }

        self.actuator.enable_outputs();
        self.commanded = target;
        self.actuator.move_to(target);
        self.move_start_ms = now_ms;
        debug!("move to {}", target);

        Ok(target)
    }

    /// Traverse to a rail position at normal speed
    pub fn travel(
        &mut self,
        position: i32,
        emergency_stop: bool,
        now_ms: u32,
    ) -> Result<i32, MoveRefused> {
        self.set_profile(SpeedProfile::Normal);
        self.move_to(position, false, emergency_stop, now_ms)
    }

    /// Start homing: slow, unclamped move toward the reset position
    pub fn home(&mut self, emergency_stop: bool, now_ms: u32) -> Result<i32, MoveRefused> {
        self.set_profile(SpeedProfile::Homing);
        self.move_to(self.config.reset_position, true, emergency_stop, now_ms)
    }

    /// Advance stepping
    #[inline]
    pub fn run(&mut self, now_us: u64) -> bool {
        self.actuator.run(now_us)
    }

    /// Stop as fast as possible and de-energize
    pub fn halt(&mut self) {
        self.actuator.stop();
        self.actuator.disable_outputs();
    }

    /// De-energize without changing the target
    pub fn disable_outputs(&mut self) {
        self.actuator.disable_outputs();
    }

    /// Redefine the current position as the far rail end and stop
    pub fn pin_home(&mut self) {
        self.actuator.set_current_position(self.config.max_rail_position);
        self.actuator.stop();
        self.actuator.disable_outputs();
    }

    /// Interpret the limit switch for this tick
    ///
    /// An asserted switch only counts when the carriage is driving toward
    /// it, or once the debounce window after the last move start has passed
    /// (the carriage may still be sitting on the switch as it moves off).
    pub fn check_limit(&mut self, asserted: bool, now_ms: u32) -> LimitEvent {
        if !asserted {
            return LimitEvent::Clear;
        }

        let toward = self.actuator.target_position() > self.actuator.current_position();
        let settled = elapsed_ms(now_ms, self.move_start_ms) > self.config.limit_debounce_ms;
        if !(toward || settled) {
            return LimitEvent::Clear;
        }

        if self.homing_expected() {
            trace!("limit reached, position pinned");
            self.pin_home();
            LimitEvent::Homed
        } else {
            self.halt();
            LimitEvent::Unexpected
        }
    }

    /// Whether a switch hit now would mean the carriage is home
    fn homing_expected(&self) -> bool {
        self.commanded == self.config.reset_position
            || (self.commanded == self.config.max_rail_position
                && self.actuator.distance_to_go() < self.config.far_end_window)
    }

    /// Whether the current move has exceeded the move timeout
    pub fn move_timed_out(&self, now_ms: u32) -> bool {
        elapsed_ms(now_ms, self.move_start_ms) > self.config.move_timeout_ms
    }

    pub fn distance_to_go(&self) -> i32 {
        self.actuator.distance_to_go()
    }

    pub fn current_position(&self) -> i32 {
        self.actuator.current_position()
    }

    /// Last commanded target
    pub fn commanded_target(&self) -> i32 {
        self.commanded
    }

    /// Borrow the wrapped actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}
