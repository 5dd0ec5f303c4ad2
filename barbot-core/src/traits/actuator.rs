//! Carriage actuator trait
//!
//! Abstracts a target-position motor driver (step/dir stepper with an
//! acceleration profile). The core only ever commands targets and polls
//! progress; pulse generation belongs to the implementation.

/// Target-position actuator
///
/// Positions are signed step counts from the home reference. `run` must be
/// cheap and non-blocking; it is called several times per control tick.
pub trait Actuator {
    /// Set the maximum speed in steps per second
    fn set_max_speed(&mut self, steps_per_s: f32);

    /// Set the acceleration and deceleration in steps per second²
    fn set_acceleration(&mut self, steps_per_s2: f32);

    /// Begin moving toward an absolute position
    fn move_to(&mut self, position: i32);

    /// Emit any step that is due
    ///
    /// # Arguments
    /// * `now_us` - Monotonic timestamp in microseconds
    ///
    /// # Returns
    /// `true` while the actuator is still moving
    fn run(&mut self, now_us: u64) -> bool;

    /// Decelerate to a stop as quickly as the acceleration allows
    ///
    /// Replaces the target with the nearest reachable stopping point.
    fn stop(&mut self);

    /// Energize the driver
    fn enable_outputs(&mut self);

    /// De-energize the driver; the carriage no longer holds position
    fn disable_outputs(&mut self);

    /// Whether the driver is energized
    fn outputs_enabled(&self) -> bool;

    /// Current position in steps
    fn current_position(&self) -> i32;

    /// Target position in steps
    fn target_position(&self) -> i32;

    /// Signed steps remaining to the target
    fn distance_to_go(&self) -> i32 {
        self.target_position() - self.current_position()
    }

    /// Redefine the current position
    ///
    /// Also sets the target to the same value and zeroes the speed, so the
    /// actuator is at rest afterwards.
    fn set_current_position(&mut self, position: i32);
}
