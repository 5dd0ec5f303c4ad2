//! Pin-backed safety inputs

use barbot_core::config::InterlockHwConfig;
use barbot_core::traits::SafetyInputs;
use barbot_hal::gpio::ActiveInput;
use barbot_hal::InputPin;

use crate::board::active_level;

/// E-stop, limit switch and container sensor read straight from pins
#[derive(Debug)]
pub struct PinSafetyInputs<I> {
    emergency_stop: ActiveInput<I>,
    limit_switch: ActiveInput<I>,
    container_sense: ActiveInput<I>,
}

impl<I: InputPin> PinSafetyInputs<I> {
    pub const fn new(
        emergency_stop: ActiveInput<I>,
        limit_switch: ActiveInput<I>,
        container_sense: ActiveInput<I>,
    ) -> Self {
        Self {
            emergency_stop,
            limit_switch,
            container_sense,
        }
    }

    /// Wrap already-configured pins with the polarity from `config`
    pub fn from_config(
        config: &InterlockHwConfig,
        emergency_stop: I,
        limit_switch: I,
        container_sense: I,
    ) -> Self {
        Self::new(
            ActiveInput::new(emergency_stop, active_level(&config.emergency_stop)),
            ActiveInput::new(limit_switch, active_level(&config.limit_switch)),
            ActiveInput::new(container_sense, active_level(&config.container_sense)),
        )
    }
}

impl<I: InputPin> SafetyInputs for PinSafetyInputs<I> {
    fn emergency_stop(&self) -> bool {
        self.emergency_stop.is_asserted()
    }

    fn limit_switch(&self) -> bool {
        self.limit_switch.is_asserted()
    }

    fn container_present(&self) -> bool {
        self.container_sense.is_asserted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::SharedPin;
    use core::cell::Cell;

    #[test]
    fn test_factory_polarity() {
        let (estop, limit, glass) = (Cell::new(false), Cell::new(true), Cell::new(true));
        let inputs = PinSafetyInputs::from_config(
            &InterlockHwConfig::default(),
            SharedPin(&estop),
            SharedPin(&limit),
            SharedPin(&glass),
        );

        assert!(!inputs.emergency_stop());
        assert!(!inputs.limit_switch());
        assert!(inputs.container_present());

        estop.set(true);
        limit.set(false);
        glass.set(false);
        assert!(inputs.emergency_stop());
        assert!(inputs.limit_switch());
        assert!(!inputs.container_present());
    }
}
