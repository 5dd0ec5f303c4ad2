//! Optic: servo-actuated spirit measure
//!
//! Each measure swings the bottle's optic to the dispense angle, holds it
//! there while the measure empties, then returns to rest and waits for the
//! chamber to refill before the next measure.

use barbot_core::traits::{Device, DeviceStatus};
use barbot_hal::ServoOutput;

use super::pulse::{Phase, PulseTrain};

/// Optic dispenser
#[derive(Debug)]
pub struct Optic<S> {
    servo: S,
    rest_angle: u8,
    dispense_angle: u8,
    train: PulseTrain,
}

impl<S: ServoOutput> Optic<S> {
    /// Create an optic and park the servo at rest
    ///
    /// # Arguments
    /// * `servo` - Servo output
    /// * `rest_angle` - Angle with the optic closed
    /// * `dispense_angle` - Angle with the optic open
    /// * `hold_ms` - Time open per measure
    /// * `refill_ms` - Time closed between measures
    pub fn new(mut servo: S, rest_angle: u8, dispense_angle: u8, hold_ms: u16, refill_ms: u16) -> Self {
        servo.set_angle(rest_angle);
        Self {
            servo,
            rest_angle,
            dispense_angle,
            train: PulseTrain::new(u32::from(hold_ms), u32::from(refill_ms)),
        }
    }

    fn apply(&mut self, phase: Phase) {
        let angle = match phase {
            Phase::On => self.dispense_angle,
            Phase::Off | Phase::Idle => self.rest_angle,
        };
        if self.servo.angle() != angle {
            self.servo.set_angle(angle);
        }
    }

    /// Measures left, including the one in progress
    pub fn remaining(&self) -> u16 {
        self.train.remaining()
    }
}

impl<S: ServoOutput> Device for Optic<S> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        let phase = self.train.start(amount, now_ms);
        self.apply(phase);
    }

    fn stop(&mut self) {
        self.train.stop();
        self.apply(Phase::Idle);
    }

    fn poll(&mut self, now_ms: u32) {
        let phase = self.train.poll(now_ms);
        self.apply(phase);
    }

    fn status(&self) -> DeviceStatus {
        if self.train.is_busy() {
            DeviceStatus::Busy
        } else {
            DeviceStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SharedServo;
    use core::cell::Cell;

    #[test]
    fn test_parks_at_rest() {
        let angle = Cell::new(90);
        let optic = Optic::new(SharedServo(&angle), 65, 10, 3000, 2000);
        assert_eq!(angle.get(), 65);
        assert!(optic.is_idle());
    }

    #[test]
    fn test_two_measures() {
        let angle = Cell::new(0);
        let mut optic = Optic::new(SharedServo(&angle), 10, 65, 3000, 2000);

        optic.start(2, 0);
        assert_eq!(angle.get(), 65);
        assert_eq!(optic.status(), DeviceStatus::Busy);

        optic.poll(3000);
        assert_eq!(angle.get(), 10);
        optic.poll(5000);
        assert_eq!(angle.get(), 65);
        assert_eq!(optic.remaining(), 1);

        optic.poll(8000);
        assert_eq!(angle.get(), 10);
        assert_eq!(optic.status(), DeviceStatus::Busy);

        // Refill after the last measure still counts as busy
        optic.poll(10_000);
        assert!(optic.is_idle());
        assert_eq!(angle.get(), 10);
    }

    #[test]
    fn test_stop_returns_to_rest() {
        let angle = Cell::new(0);
        let mut optic = Optic::new(SharedServo(&angle), 65, 10, 3000, 2000);
        optic.start(3, 0);
        assert_eq!(angle.get(), 10);

        optic.stop();
        assert_eq!(angle.get(), 65);
        assert!(optic.is_idle());
        optic.stop();
        assert!(optic.is_idle());
    }

    #[test]
    fn test_zero_measures() {
        let angle = Cell::new(0);
        let mut optic = Optic::new(SharedServo(&angle), 65, 10, 3000, 2000);
        optic.start(0, 0);
        assert!(optic.is_idle());
        assert_eq!(angle.get(), 65);
    }
}
