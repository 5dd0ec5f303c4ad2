//! Adapters from `embedded-hal` 1.0 traits
//!
//! `embedded-hal` pins take `&mut self` and return `Result` even for reads.
//! The BarBot traits are infallible, so each adapter decides up front what a
//! failed access means.

use core::cell::RefCell;

use embedded_hal::digital;
use embedded_hal::pwm::SetDutyCycle;

use crate::gpio::{InputPin, OutputPin};
use crate::servo::{pulse_width_us, ServoOutput, SERVO_MAX_ANGLE, SERVO_PERIOD_US};

/// Wraps an `embedded_hal::digital::OutputPin`
///
/// The commanded level is tracked locally so it can be read back without
/// requiring a stateful pin.
#[derive(Debug)]
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin> EhOutput<P> {
    /// Wrap a pin, driving it low
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin, high: false }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: digital::OutputPin> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        if self.pin.set_high().is_ok() {
            self.high = true;
        }
    }

    fn set_low(&mut self) {
        if self.pin.set_low().is_ok() {
            self.high = false;
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Wraps an `embedded_hal::digital::InputPin`
#[derive(Debug)]
pub struct EhInput<P> {
    pin: RefCell<P>,
    /// Level reported when the read fails
    on_error: bool,
}

impl<P: digital::InputPin> EhInput<P> {
    /// Wrap a pin
    ///
    /// `on_error` is the raw level reported if the underlying read fails.
    /// Choose the level that asserts the signal for safety inputs.
    pub fn new(pin: P, on_error: bool) -> Self {
        Self {
            pin: RefCell::new(pin),
            on_error,
        }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: digital::InputPin> InputPin for EhInput<P> {
    fn is_high(&self) -> bool {
        match self.pin.try_borrow_mut() {
            Ok(mut pin) => pin.is_high().unwrap_or(self.on_error),
            Err(_) => self.on_error,
        }
    }
}

/// Drives a servo from a PWM channel already configured for a 50 Hz period
#[derive(Debug)]
pub struct EhServo<P> {
    pwm: P,
    angle: u8,
}

impl<P: SetDutyCycle> EhServo<P> {
    /// Wrap a PWM channel and move to the given starting angle
    pub fn new(pwm: P, initial_angle: u8) -> Self {
        let mut servo = Self { pwm, angle: 0 };
        servo.set_angle(initial_angle);
        servo
    }
}

impl<P: SetDutyCycle> ServoOutput for EhServo<P> {
    fn set_angle(&mut self, degrees: u8) {
        let degrees = degrees.min(SERVO_MAX_ANGLE);
        let pulse = pulse_width_us(degrees);
        if self
            .pwm
            .set_duty_cycle_fraction(pulse, SERVO_PERIOD_US)
            .is_ok()
        {
            self.angle = degrees;
        }
    }

    fn angle(&self) -> u8 {
        self.angle
    }
}
