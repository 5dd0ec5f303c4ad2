//! Test doubles backed by shared cells, so a test can watch and drive pins
//! that a driver owns

use core::cell::Cell;

use barbot_hal::{InputPin, OutputPin, ServoOutput};

/// Pin whose level lives in a cell owned by the test
#[derive(Debug, Clone, Copy)]
pub struct SharedPin<'a>(pub &'a Cell<bool>);

impl OutputPin for SharedPin<'_> {
    fn set_high(&mut self) {
        self.0.set(true);
    }

    fn set_low(&mut self) {
        self.0.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.0.get()
    }
}

impl InputPin for SharedPin<'_> {
    fn is_high(&self) -> bool {
        self.0.get()
    }
}

/// Servo whose angle lives in a cell owned by the test
#[derive(Debug, Clone, Copy)]
pub struct SharedServo<'a>(pub &'a Cell<u8>);

impl ServoOutput for SharedServo<'_> {
    fn set_angle(&mut self, degrees: u8) {
        self.0.set(degrees);
    }

    fn angle(&self) -> u8 {
        self.0.get()
    }
}

/// Output pin that counts rising edges
#[derive(Debug, Default)]
pub struct CountingPin {
    pub high: bool,
    pub rising_edges: u32,
}

impl OutputPin for CountingPin {
    fn set_high(&mut self) {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
