//! Config-driven construction
//!
//! Boards hand out pins by number through [`PinBank`]; the builders here
//! turn a [`MachineConfig`] into the carriage stepper, the safety inputs
//! and the populated device registry.

use barbot_core::config::{
    CarriageHwConfig, ConfigError, DeviceHwConfig, InterlockHwConfig, MachineConfig, PinConfig,
};
use barbot_core::registry::{DeviceRegistry, RegistryError};
use barbot_hal::gpio::{ActiveInput, ActiveOutput};
use barbot_hal::{ActiveLevel, InputPin, OutputPin, ServoOutput};

use crate::dispenser::{
    Conveyor, Dasher, Dispenser, Optic, PulseOutput, Syringe, TimedOutput, STIRRER_MS_PER_UNIT,
};
use crate::interlock::PinSafetyInputs;
use crate::stepper::StepDirStepper;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number does not exist on this board
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin cannot drive a servo
    NoPwm,
}

/// Error building hardware from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuildError {
    /// The configuration is inconsistent
    Config(ConfigError),
    /// A pin could not be obtained
    Pin { pin: u8, error: PinError },
    /// A device could not be installed
    Registry(RegistryError),
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RegistryError> for BuildError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

/// Source of board pins by number
///
/// Implementations configure the pin (direction, pull-up) from the
/// [`PinConfig`] and refuse to hand out the same pin twice. Polarity is
/// applied by the drivers, not the bank.
pub trait PinBank {
    type Output: OutputPin;
    type Input: InputPin;
    type Servo: ServoOutput;

    fn output(&mut self, pin: PinConfig) -> Result<Self::Output, PinError>;

    fn input(&mut self, pin: PinConfig) -> Result<Self::Input, PinError>;

    fn servo(&mut self, pin: PinConfig) -> Result<Self::Servo, PinError>;
}

/// Device type produced for a given bank
pub type BoardDispenser<B> =
    Dispenser<<B as PinBank>::Output, <B as PinBank>::Input, <B as PinBank>::Servo>;

/// Active level implied by a pin's inversion flag
pub const fn active_level(pin: &PinConfig) -> ActiveLevel {
    if pin.inverted {
        ActiveLevel::Low
    } else {
        ActiveLevel::High
    }
}

fn output<B: PinBank>(bank: &mut B, pin: PinConfig) -> Result<ActiveOutput<B::Output>, BuildError> {
    let raw = bank
        .output(pin)
        .map_err(|error| BuildError::Pin { pin: pin.pin, error })?;
    Ok(ActiveOutput::new(raw, active_level(&pin)))
}

fn raw_input<B: PinBank>(bank: &mut B, pin: PinConfig) -> Result<B::Input, BuildError> {
    bank.input(pin)
        .map_err(|error| BuildError::Pin { pin: pin.pin, error })
}

fn input<B: PinBank>(bank: &mut B, pin: PinConfig) -> Result<ActiveInput<B::Input>, BuildError> {
    Ok(ActiveInput::new(raw_input(bank, pin)?, active_level(&pin)))
}

/// Build one device from its wiring
pub fn build_device<B: PinBank>(
    hw: &DeviceHwConfig,
    bank: &mut B,
) -> Result<BoardDispenser<B>, BuildError> {
    let device = match *hw {
        DeviceHwConfig::Optic {
            servo,
            rest_angle,
            dispense_angle,
            hold_ms,
            refill_ms,
        } => {
            let raw = bank
                .servo(servo)
                .map_err(|error| BuildError::Pin { pin: servo.pin, error })?;
            Dispenser::Optic(Optic::new(raw, rest_angle, dispense_angle, hold_ms, refill_ms))
        }
        DeviceHwConfig::Mixer { valve, ms_per_ml } => {
            Dispenser::Mixer(TimedOutput::new(output(bank, valve)?, ms_per_ml))
        }
        DeviceHwConfig::Dasher {
            tip,
            back,
            stroke_ms,
        } => Dispenser::Dasher(Dasher::new(output(bank, tip)?, output(bank, back)?, stroke_ms)),
        DeviceHwConfig::Syringe {
            extend,
            retract,
            ms_per_unit,
        } => Dispenser::Syringe(Syringe::new(
            output(bank, extend)?,
            output(bank, retract)?,
            ms_per_unit,
        )),
        DeviceHwConfig::Conveyor {
            motor,
            index,
            slot_timeout_ms,
        } => Dispenser::Conveyor(Conveyor::new(
            output(bank, motor)?,
            input(bank, index)?,
            slot_timeout_ms,
        )),
        DeviceHwConfig::Slice {
            motor,
            on_ms,
            off_ms,
        } => Dispenser::Slice(PulseOutput::new(output(bank, motor)?, on_ms, off_ms)),
        DeviceHwConfig::Stirrer { motor } => {
            Dispenser::Stirrer(TimedOutput::new(output(bank, motor)?, STIRRER_MS_PER_UNIT))
        }
        DeviceHwConfig::Umbrella {
            release,
            on_ms,
            off_ms,
        } => Dispenser::Umbrella(PulseOutput::new(output(bank, release)?, on_ms, off_ms)),
    };
    Ok(device)
}

/// Validate `config` and build every configured device
pub fn build_registry<B: PinBank>(
    config: &MachineConfig,
    bank: &mut B,
) -> Result<DeviceRegistry<BoardDispenser<B>>, BuildError> {
    config.validate()?;

    let mut registry = DeviceRegistry::new();
    for (id, hw) in config.devices.iter().enumerate() {
        if let Some(hw) = hw {
            let device = build_device(hw, bank)?;
            registry.insert(id as u16, device)?;
        }
    }
    Ok(registry)
}

/// Build the carriage stepper, driver disabled
pub fn build_carriage<B: PinBank>(
    config: &CarriageHwConfig,
    bank: &mut B,
) -> Result<StepDirStepper<B::Output>, BuildError> {
    Ok(StepDirStepper::new(
        output(bank, config.step)?,
        output(bank, config.dir)?,
        output(bank, config.enable)?,
    ))
}

/// Build the safety inputs
pub fn build_interlocks<B: PinBank>(
    config: &InterlockHwConfig,
    bank: &mut B,
) -> Result<PinSafetyInputs<B::Input>, BuildError> {
    Ok(PinSafetyInputs::from_config(
        config,
        raw_input(bank, config.emergency_stop)?,
        raw_input(bank, config.limit_switch)?,
        raw_input(bank, config.container_sense)?,
    ))
}
