//! Hobby servo output
//!
//! The optics are actuated by ordinary 50 Hz hobby servos. Drivers only ever
//! ask for an angle; how the pulse is produced is up to the board.

/// Servo frame period in microseconds (50 Hz)
pub const SERVO_PERIOD_US: u16 = 20_000;

/// Pulse width at 0 degrees
pub const SERVO_MIN_PULSE_US: u16 = 1_000;

/// Pulse width at 180 degrees
pub const SERVO_MAX_PULSE_US: u16 = 2_000;

/// Largest commandable angle
pub const SERVO_MAX_ANGLE: u8 = 180;

/// Position-commanded servo output
pub trait ServoOutput {
    /// Command the servo to an angle in degrees (clamped to 0-180)
    fn set_angle(&mut self, degrees: u8);

    /// Last commanded angle
    fn angle(&self) -> u8;
}

/// Pulse width for a given angle
pub const fn pulse_width_us(degrees: u8) -> u16 {
    let degrees = if degrees > SERVO_MAX_ANGLE {
        SERVO_MAX_ANGLE
    } else {
        degrees
    };
    let span = (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US) as u32;
    SERVO_MIN_PULSE_US + (span * degrees as u32 / SERVO_MAX_ANGLE as u32) as u16
}
