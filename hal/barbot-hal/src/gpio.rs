//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by board support code, plus the active-level convention used to turn raw
//! pin levels into "asserted" / "not asserted".

/// Electrical level at which a signal counts as asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Asserted when the pin reads high
    #[default]
    High,
    /// Asserted when the pin reads low (pull-up to an NO switch, etc.)
    Low,
}

impl ActiveLevel {
    /// Interpret a raw pin level
    pub const fn is_asserted(self, high: bool) -> bool {
        match self {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        }
    }

    /// Raw pin level that asserts (or releases) the signal
    pub const fn level_for(self, asserted: bool) -> bool {
        match self {
            ActiveLevel::High => asserted,
            ActiveLevel::Low => !asserted,
        }
    }
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Output pin with a fixed active level
///
/// Drivers talk in terms of "on"/"off"; the polarity is decided once, where
/// the pin is wired.
#[derive(Debug)]
pub struct ActiveOutput<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: OutputPin> ActiveOutput<P> {
    /// Wrap a pin and drive it to the inactive level
    pub fn new(pin: P, level: ActiveLevel) -> Self {
        let mut out = Self { pin, level };
        out.set_active(false);
        out
    }

    /// Assert or release the output
    pub fn set_active(&mut self, active: bool) {
        self.pin.set_state(self.level.level_for(active));
    }

    /// Whether the output is currently asserted
    pub fn is_active(&self) -> bool {
        self.level.is_asserted(self.pin.is_set_high())
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// Input pin with a fixed active level
#[derive(Debug)]
pub struct ActiveInput<P> {
    pin: P,
    level: ActiveLevel,
}

impl<P: InputPin> ActiveInput<P> {
    /// Wrap a pin
    pub const fn new(pin: P, level: ActiveLevel) -> Self {
        Self { pin, level }
    }

    /// Whether the signal is asserted
    pub fn is_asserted(&self) -> bool {
        self.level.is_asserted(self.pin.is_high())
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Mutably borrow the underlying pin (test harnesses drive it)
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_level_interpretation() {
        assert!(ActiveLevel::High.is_asserted(true));
        assert!(!ActiveLevel::High.is_asserted(false));
        assert!(ActiveLevel::Low.is_asserted(false));
        assert!(!ActiveLevel::Low.is_asserted(true));
    }

    #[test]
    fn test_active_low_output_starts_released() {
        let out = ActiveOutput::new(MockPin { high: false }, ActiveLevel::Low);
        assert!(!out.is_active());
        assert!(out.pin().is_set_high());
    }

    #[test]
    fn test_active_high_output() {
        let mut out = ActiveOutput::new(MockPin { high: true }, ActiveLevel::High);
        assert!(!out.is_active());

        out.set_active(true);
        assert!(out.is_active());
        assert!(out.pin().is_set_high());

        out.set_active(false);
        assert!(out.pin().is_set_low());
    }

    #[test]
    fn test_active_low_input() {
        let mut input = ActiveInput::new(MockPin { high: true }, ActiveLevel::Low);
        assert!(!input.is_asserted());

        input.pin_mut().high = false;
        assert!(input.is_asserted());
    }
}
