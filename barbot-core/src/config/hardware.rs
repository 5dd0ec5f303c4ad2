//! Hardware configuration types
//!
//! These types define the hardware-level configuration for pins, the
//! carriage stepper, the safety inputs and every dispensing device.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::DEVICE_COUNT;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// Board pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Mark the pin active-low
    pub const fn invert(self) -> Self {
        Self {
            inverted: true,
            ..self
        }
    }
}

/// Carriage stepper driver wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CarriageHwConfig {
    /// Step pulse pin
    pub step: PinConfig,
    /// Direction pin
    pub dir: PinConfig,
    /// Driver enable pin
    pub enable: PinConfig,
}

impl Default for CarriageHwConfig {
    fn default() -> Self {
        Self {
            step: PinConfig::new(2),
            dir: PinConfig::new(3),
            // Driver enable is active-low
            enable: PinConfig::inverted(4),
        }
    }
}

impl CarriageHwConfig {
    /// Pin numbers used by the carriage
    pub fn pins(&self) -> impl Iterator<Item = u8> {
        [self.step.pin, self.dir.pin, self.enable.pin].into_iter()
    }
}

/// Safety input wiring
///
/// All three inputs use pull-ups. The emergency stop and the container
/// sensor read high when asserted; the limit switch pulls its line low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterlockHwConfig {
    /// Emergency stop line
    pub emergency_stop: PinConfig,
    /// Carriage travel limit switch at the far rail end
    pub limit_switch: PinConfig,
    /// Container (glass) presence sensor
    pub container_sense: PinConfig,
}

impl Default for InterlockHwConfig {
    fn default() -> Self {
        Self {
            emergency_stop: PinConfig::with_pullup(18),
            limit_switch: PinConfig::with_pullup(19).invert(),
            container_sense: PinConfig::with_pullup(20),
        }
    }
}

impl InterlockHwConfig {
    /// Pin numbers used by the safety inputs
    pub fn pins(&self) -> impl Iterator<Item = u8> {
        [
            self.emergency_stop.pin,
            self.limit_switch.pin,
            self.container_sense.pin,
        ]
        .into_iter()
    }
}

/// Device variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceKind {
    /// Servo-actuated spirit measure
    Optic,
    /// Pressurised mixer valve
    Mixer,
    /// Bitters dasher
    Dasher,
    /// Linear-actuator syringe
    Syringe,
    /// Indexed conveyor
    Conveyor,
    /// Garnish slice dispenser
    Slice,
    /// Stirrer
    Stirrer,
    /// Umbrella dropper
    Umbrella,
}

/// Wiring and tuning of one dispensing device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviceHwConfig {
    /// Servo swings the measure between rest and dispense angles
    Optic {
        servo: PinConfig,
        rest_angle: u8,
        dispense_angle: u8,
        /// Time held at the dispense angle per measure (ms)
        hold_ms: u16,
        /// Time at rest for the measure to refill (ms)
        refill_ms: u16,
    },
    /// Solenoid valve open for a time proportional to the volume
    Mixer {
        valve: PinConfig,
        /// Valve open time per millilitre (ms)
        ms_per_ml: u16,
    },
    /// H-bridge pair tipping the dasher out and back
    Dasher {
        tip: PinConfig,
        back: PinConfig,
        /// Time spent on each half of a dash (ms)
        stroke_ms: u16,
    },
    /// H-bridge pair driving a linear actuator
    Syringe {
        extend: PinConfig,
        retract: PinConfig,
        /// Extension time per unit dispensed (ms)
        ms_per_unit: u16,
    },
    /// Belt motor with an index sensor, one pulse per slot
    Conveyor {
        motor: PinConfig,
        index: PinConfig,
        /// Longest time one slot may take (ms)
        slot_timeout_ms: u16,
    },
    /// Single-output pulse dispenser
    Slice { motor: PinConfig, on_ms: u16, off_ms: u16 },
    /// Motor run for a time proportional to the amount
    Stirrer { motor: PinConfig },
    /// Single-output pulse dispenser
    Umbrella { release: PinConfig, on_ms: u16, off_ms: u16 },
}

impl DeviceHwConfig {
    /// Default optic tuning on the given servo pin
    pub const fn optic(pin: u8, rest_angle: u8, dispense_angle: u8) -> Self {
        Self::Optic {
            servo: PinConfig::new(pin),
            rest_angle,
            dispense_angle,
            hold_ms: 3000,
            refill_ms: 2000,
        }
    }

    /// Default mixer tuning on the given valve pin
    pub const fn mixer(pin: u8) -> Self {
        Self::Mixer {
            valve: PinConfig::new(pin),
            ms_per_ml: 100,
        }
    }

    /// Default dasher tuning on the given H-bridge pins
    pub const fn dasher(tip: u8, back: u8) -> Self {
        Self::Dasher {
            tip: PinConfig::new(tip),
            back: PinConfig::new(back),
            stroke_ms: 300,
        }
    }

    /// Which variant this is
    pub const fn kind(&self) -> DeviceKind {
        match self {
            Self::Optic { .. } => DeviceKind::Optic,
            Self::Mixer { .. } => DeviceKind::Mixer,
            Self::Dasher { .. } => DeviceKind::Dasher,
            Self::Syringe { .. } => DeviceKind::Syringe,
            Self::Conveyor { .. } => DeviceKind::Conveyor,
            Self::Slice { .. } => DeviceKind::Slice,
            Self::Stirrer { .. } => DeviceKind::Stirrer,
            Self::Umbrella { .. } => DeviceKind::Umbrella,
        }
    }

    /// Pin numbers claimed by this device
    pub fn pins(&self) -> Vec<u8, 2> {
        let mut pins = Vec::new();
        let (a, b) = match *self {
            Self::Optic { servo, .. } => (servo, None),
            Self::Mixer { valve, .. } => (valve, None),
            Self::Dasher { tip, back, .. } => (tip, Some(back)),
            Self::Syringe {
                extend, retract, ..
            } => (extend, Some(retract)),
            Self::Conveyor { motor, index, .. } => (motor, Some(index)),
            Self::Slice { motor, .. } => (motor, None),
            Self::Stirrer { motor } => (motor, None),
            Self::Umbrella { release, .. } => (release, None),
        };
        let _ = pins.push(a.pin);
        if let Some(b) = b {
            let _ = pins.push(b.pin);
        }
        pins
    }
}

/// Factory wiring of the machine, indexed by device id
pub const DEFAULT_DEVICES: [Option<DeviceHwConfig>; DEVICE_COUNT] = [
    None,
    // Optics; mounting alternates so rest/dispense angles swap
    Some(DeviceHwConfig::optic(40, 65, 10)),
    Some(DeviceHwConfig::optic(42, 10, 65)),
    Some(DeviceHwConfig::optic(44, 65, 10)),
    Some(DeviceHwConfig::optic(46, 10, 65)),
    Some(DeviceHwConfig::optic(48, 65, 10)),
    Some(DeviceHwConfig::optic(50, 65, 10)),
    // Pressure mixers
    Some(DeviceHwConfig::mixer(41)),
    Some(DeviceHwConfig::mixer(43)),
    Some(DeviceHwConfig::mixer(45)),
    Some(DeviceHwConfig::mixer(47)),
    Some(DeviceHwConfig::mixer(49)),
    Some(DeviceHwConfig::mixer(51)),
    // Dashers
    Some(DeviceHwConfig::dasher(22, 23)),
    Some(DeviceHwConfig::dasher(24, 25)),
    Some(DeviceHwConfig::dasher(26, 27)),
    Some(DeviceHwConfig::Syringe {
        extend: PinConfig::new(5),
        retract: PinConfig::new(6),
        ms_per_unit: 500,
    }),
    Some(DeviceHwConfig::Conveyor {
        motor: PinConfig::new(38),
        index: PinConfig::with_pullup(39),
        slot_timeout_ms: 5000,
    }),
    Some(DeviceHwConfig::Slice {
        motor: PinConfig::new(34),
        on_ms: 800,
        off_ms: 400,
    }),
    Some(DeviceHwConfig::Stirrer {
        motor: PinConfig::new(36),
    }),
    Some(DeviceHwConfig::Umbrella {
        release: PinConfig::new(32),
        on_ms: 250,
        off_ms: 500,
    }),
];
