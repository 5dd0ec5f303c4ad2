//! Step/direction stepper with a trapezoidal speed ramp
//!
//! Speed is recomputed after every step from the relation v² = v₀² + 2as,
//! so one step changes v² by 2a. The ramp accelerates up to the maximum
//! speed and starts braking once the remaining distance is within the
//! stopping distance v²/2a.

use barbot_core::traits::Actuator;
use barbot_hal::gpio::ActiveOutput;
use barbot_hal::OutputPin;

/// Current ramp phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampState {
    /// At rest on the target
    Stopped,
    /// Speeding up toward the maximum speed
    Accelerating,
    /// Cruising at the maximum speed
    AtSpeed,
    /// Braking toward the target or a direction change
    Decelerating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    const fn of(distance: i32) -> Self {
        if distance < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    const fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Square root for `no_std` builds
///
/// Bit-level first guess refined by Newton iterations; plenty for step
/// timing.
fn sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut y = f32::from_bits((x.to_bits() >> 1) + 0x1fbd_1df5);
    for _ in 0..4 {
        y = 0.5 * (y + x / y);
    }
    y
}

/// Stepper driven through step, direction and enable pins
#[derive(Debug)]
pub struct StepDirStepper<P> {
    step: ActiveOutput<P>,
    dir: ActiveOutput<P>,
    enable: ActiveOutput<P>,
    position: i32,
    target: i32,
    /// Speed magnitude in steps/s
    speed: f32,
    direction: Direction,
    max_speed: f32,
    acceleration: f32,
    /// Microseconds between steps at the current speed; 0 when at rest
    interval_us: u64,
    last_step_us: u64,
    ramp: RampState,
}

impl<P: OutputPin> StepDirStepper<P> {
    /// Create a stepper at position 0 with its driver disabled
    pub fn new(step: ActiveOutput<P>, dir: ActiveOutput<P>, mut enable: ActiveOutput<P>) -> Self {
        enable.set_active(false);
        Self {
            step,
            dir,
            enable,
            position: 0,
            target: 0,
            speed: 0.0,
            direction: Direction::Forward,
            max_speed: 1.0,
            acceleration: 1.0,
            interval_us: 0,
            last_step_us: 0,
            ramp: RampState::Stopped,
        }
    }

    pub fn ramp(&self) -> RampState {
        self.ramp
    }

    /// Current speed magnitude in steps/s
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Borrow the step pin
    pub fn step_pin(&self) -> &P {
        self.step.pin()
    }

    /// Borrow the enable pin
    pub fn enable_pin(&self) -> &P {
        self.enable.pin()
    }

    fn stopping_distance(&self) -> f32 {
        self.speed * self.speed / (2.0 * self.acceleration)
    }

    fn first_step_speed(&self) -> f32 {
        sqrt(2.0 * self.acceleration).min(self.max_speed)
    }

    fn halt_ramp(&mut self) {
        self.speed = 0.0;
        self.interval_us = 0;
        self.ramp = RampState::Stopped;
    }

    /// Work out the speed for the next step
    fn compute_speed(&mut self) {
        let distance = self.target - self.position;
        if distance == 0 {
            self.halt_ramp();
            return;
        }

        let wanted = Direction::of(distance);
        let two_a = 2.0 * self.acceleration;

        if self.speed <= 0.0 {
            self.direction = wanted;
            self.speed = self.first_step_speed();
            self.ramp = RampState::Accelerating;
        } else if self.direction != wanted
            || distance.unsigned_abs() as f32 <= self.stopping_distance()
            || self.speed > self.max_speed
        {
            let v2 = self.speed * self.speed - two_a;
            if v2 <= 0.0 {
                // Came to rest short of the target or turned around
                self.direction = wanted;
                self.speed = self.first_step_speed();
                self.ramp = RampState::Accelerating;
            } else if self.direction == wanted && self.speed > self.max_speed {
                self.speed = sqrt(v2).max(self.max_speed);
                self.ramp = RampState::Decelerating;
            } else {
                self.speed = sqrt(v2);
                self.ramp = RampState::Decelerating;
            }
        } else if self.speed < self.max_speed {
            self.speed = sqrt(self.speed * self.speed + two_a).min(self.max_speed);
            self.ramp = if self.speed < self.max_speed {
                RampState::Accelerating
            } else {
                RampState::AtSpeed
            };
        } else {
            self.ramp = RampState::AtSpeed;
        }

        self.interval_us = (1_000_000.0 / self.speed) as u64;
    }

    fn step_once(&mut self, now_us: u64) {
        self.dir.set_active(self.direction == Direction::Forward);
        self.step.set_active(true);
        self.step.set_active(false);
        self.position += self.direction.sign();
        self.last_step_us = now_us;
    }
}

impl<P: OutputPin> Actuator for StepDirStepper<P> {
    fn set_max_speed(&mut self, steps_per_s: f32) {
        let speed = if steps_per_s < 0.0 { -steps_per_s } else { steps_per_s };
        if speed > 0.0 {
            self.max_speed = speed;
        }
    }

    fn set_acceleration(&mut self, steps_per_s2: f32) {
        let accel = if steps_per_s2 < 0.0 { -steps_per_s2 } else { steps_per_s2 };
        if accel > 0.0 {
            self.acceleration = accel;
        }
    }

    fn move_to(&mut self, position: i32) {
        self.target = position;
    }

    fn run(&mut self, now_us: u64) -> bool {
        if self.interval_us == 0 {
            if self.target == self.position {
                return false;
            }
            self.compute_speed();
            self.last_step_us = now_us;
        }

        if now_us.wrapping_sub(self.last_step_us) >= self.interval_us {
            self.step_once(now_us);
            self.compute_speed();
        }

        self.interval_us != 0
    }

    fn stop(&mut self) {
        if self.speed > 0.0 {
            // Truncation toward zero plus one covers any fractional step
            let steps = self.stopping_distance() as i32 + 1;
            self.target = self.position + steps * self.direction.sign();
        } else {
            self.target = self.position;
        }
    }

    fn enable_outputs(&mut self) {
        self.enable.set_active(true);
    }

    fn disable_outputs(&mut self) {
        self.enable.set_active(false);
    }

    fn outputs_enabled(&self) -> bool {
        self.enable.is_active()
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
        self.halt_ramp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::CountingPin;
    use barbot_hal::ActiveLevel;

    fn stepper() -> StepDirStepper<CountingPin> {
        let mut stepper = StepDirStepper::new(
            ActiveOutput::new(CountingPin::default(), ActiveLevel::High),
            ActiveOutput::new(CountingPin::default(), ActiveLevel::High),
            ActiveOutput::new(CountingPin::default(), ActiveLevel::Low),
        );
        stepper.set_max_speed(1000.0);
        stepper.set_acceleration(1000.0);
        stepper
    }

    /// Run in 50 µs ticks until the move completes; returns the end time
    fn run_to_end(stepper: &mut StepDirStepper<CountingPin>, mut now_us: u64) -> u64 {
        let deadline = now_us + 60_000_000;
        while stepper.run(now_us) {
            assert!(stepper.speed() <= stepper.max_speed() + 0.01);
            now_us += 50;
            assert!(now_us < deadline, "move did not finish");
        }
        now_us
    }

    #[test]
    fn test_sqrt() {
        for x in [1.0f32, 2.0, 2000.0, 1.0e6, 0.25] {
            let root = sqrt(x);
            let err = root * root - x;
            assert!(err < x * 1.0e-4 && err > -x * 1.0e-4);
        }
        assert_eq!(sqrt(0.0), 0.0);
        assert_eq!(sqrt(-4.0), 0.0);
    }

    #[test]
    fn test_short_move_lands_on_target() {
        let mut stepper = stepper();
        stepper.move_to(100);
        assert_eq!(stepper.distance_to_go(), 100);

        run_to_end(&mut stepper, 0);
        assert_eq!(stepper.current_position(), 100);
        assert_eq!(stepper.step_pin().rising_edges, 100);
        assert_eq!(stepper.ramp(), RampState::Stopped);
        assert_eq!(stepper.speed(), 0.0);
    }

    #[test]
    fn test_long_move_reaches_cruise() {
        let mut stepper = stepper();
        stepper.move_to(-2000);

        let mut now = 0;
        let mut cruised = false;
        while stepper.run(now) {
            cruised |= stepper.ramp() == RampState::AtSpeed;
            now += 50;
        }
        assert!(cruised);
        assert_eq!(stepper.current_position(), -2000);
        // 500 steps up, 1000 at speed, 500 down: roughly 3 s
        assert!(now > 2_500_000 && now < 3_500_000, "took {now} us");
    }

    #[test]
    fn test_stop_brakes_within_stopping_distance() {
        let mut stepper = stepper();
        stepper.move_to(5000);

        let mut now = 0;
        while stepper.current_position() < 300 {
            stepper.run(now);
            now += 50;
        }
        let at_stop = stepper.current_position();
        let braking = stepper.speed() * stepper.speed() / 2000.0;
        stepper.stop();
        assert!(stepper.target_position() > at_stop);

        run_to_end(&mut stepper, now);
        let travelled = (stepper.current_position() - at_stop) as f32;
        assert!(travelled >= braking - 1.0 && travelled <= braking + 2.0);
        assert_eq!(stepper.distance_to_go(), 0);
    }

    #[test]
    fn test_retarget_behind_turns_around() {
        let mut stepper = stepper();
        stepper.move_to(1000);

        let mut now = 0;
        while stepper.current_position() < 200 {
            stepper.run(now);
            now += 50;
        }
        stepper.move_to(0);

        let mut furthest = stepper.current_position();
        while stepper.run(now) {
            furthest = furthest.max(stepper.current_position());
            now += 50;
        }
        assert!(furthest > 200);
        assert_eq!(stepper.current_position(), 0);
    }

    #[test]
    fn test_set_current_position_stops() {
        let mut stepper = stepper();
        stepper.move_to(1000);
        for now in (0..200_000).step_by(50) {
            stepper.run(now);
        }
        assert!(stepper.speed() > 0.0);

        stepper.set_current_position(10_000);
        assert_eq!(stepper.current_position(), 10_000);
        assert_eq!(stepper.target_position(), 10_000);
        assert_eq!(stepper.speed(), 0.0);
        assert!(!stepper.run(200_000));
    }

    #[test]
    fn test_enable_pin_is_active_low() {
        let mut stepper = stepper();
        assert!(!stepper.outputs_enabled());
        assert!(stepper.enable_pin().high);

        stepper.enable_outputs();
        assert!(stepper.outputs_enabled());
        assert!(!stepper.enable_pin().high);

        stepper.disable_outputs();
        assert!(stepper.enable_pin().high);
    }

    #[test]
    fn test_lowering_max_speed_slows_down() {
        let mut stepper = stepper();
        stepper.move_to(10_000);
        let mut now = 0;
        while stepper.ramp() != RampState::AtSpeed {
            stepper.run(now);
            now += 50;
        }

        stepper.set_max_speed(500.0);
        for _ in 0..40_000 {
            stepper.run(now);
            now += 50;
        }
        assert!(stepper.speed() <= 500.01);
    }

    #[test]
    fn test_ignores_non_positive_settings() {
        let mut stepper = stepper();
        stepper.set_max_speed(0.0);
        stepper.set_acceleration(0.0);
        assert_eq!(stepper.max_speed(), 1000.0);
        stepper.set_max_speed(-300.0);
        assert_eq!(stepper.max_speed(), 300.0);
    }
}
