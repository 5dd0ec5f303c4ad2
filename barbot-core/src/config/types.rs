//! Configuration type definitions
//!
//! These types represent the machine configuration. Configuration can be
//! stored in flash as postcard-serialized binary data (see [`super::storage`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{DeviceHwConfig, InterlockHwConfig, CarriageHwConfig, DEFAULT_DEVICES};

/// Maximum instructions per program
pub const MAX_INSTRUCTIONS: usize = 64;

/// Device table size; valid device ids are `1..DEVICE_COUNT`
pub const DEVICE_COUNT: usize = 21;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Speed or acceleration is zero or negative
    InvalidSpeed,
    /// Homing speed exceeds the normal traverse speed
    HomingTooFast,
    /// Reset position does not lie beyond the rail end
    ResetInsideRail,
    /// Move timeout of zero would fault every move
    ZeroTimeout,
    /// A full-rail homing run cannot finish within the move timeout
    TimeoutTooShort,
    /// Device id 0 is reserved
    ReservedDeviceId,
    /// Two signals share one pin
    PinConflict(u8),
    /// Stored blob has the wrong magic number
    BadMagic,
    /// Stored blob was written by an incompatible version
    VersionMismatch(u8),
    /// Serialization failed or the buffer is too small
    Encoding,
}

/// Carriage motion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionConfig {
    /// Traverse speed for MOVE (steps/s)
    pub normal_speed: f32,
    /// Homing speed for ZERO (steps/s)
    pub homing_speed: f32,
    /// Acceleration for both profiles (steps/s²)
    pub acceleration: f32,
    /// Far rail end; MOVE targets are clamped to this
    pub max_rail_position: i32,
    /// Homing target, deliberately beyond the rail end so the limit switch
    /// is reached before the move completes
    pub reset_position: i32,
    /// Maximum time a MOVE or ZERO may take (ms)
    pub move_timeout_ms: u32,
    /// Limit switch is ignored for this long after a move away from it
    pub limit_debounce_ms: u32,
    /// A far-end move hitting the switch within this many steps of its
    /// target counts as reaching home
    pub far_end_window: i32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            normal_speed: 1000.0,
            homing_speed: 500.0,
            acceleration: 1000.0,
            max_rail_position: 10_000,
            reset_position: 12_000,
            move_timeout_ms: 30_000,
            limit_debounce_ms: 250,
            far_end_window: 100,
        }
    }
}

impl MotionConfig {
    /// Clamp a commanded position to the rail end
    ///
    /// Only the upper bound is enforced; positions below zero are passed
    /// through to the actuator unchanged.
    pub fn clamp(&self, position: i32) -> i32 {
        position.min(self.max_rail_position)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.normal_speed > 0.0 && self.homing_speed > 0.0 && self.acceleration > 0.0) {
            return Err(ConfigError::InvalidSpeed);
        }
        if self.homing_speed > self.normal_speed {
            return Err(ConfigError::HomingTooFast);
        }
        if self.reset_position <= self.max_rail_position {
            return Err(ConfigError::ResetInsideRail);
        }
        if self.move_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        let homing_ms = self.max_rail_position as f32 / self.homing_speed * 1000.0;
        if homing_ms >= self.move_timeout_ms as f32 {
            return Err(ConfigError::TimeoutTooShort);
        }
        Ok(())
    }
}

/// Interlock behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafetyConfig {
    /// Read the container sensor. When disabled a container is always
    /// reported present, so programs never wait and never abort on removal.
    pub container_sensing: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            container_sensing: true,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    /// Format version
    pub version: u8,
    /// Carriage motion
    pub motion: MotionConfig,
    /// Interlock behaviour
    pub safety: SafetyConfig,
    /// Carriage stepper wiring
    pub carriage: CarriageHwConfig,
    /// Safety input wiring
    pub interlocks: InterlockHwConfig,
    /// Device table indexed by id; slot 0 is always empty
    pub devices: [Option<DeviceHwConfig>; DEVICE_COUNT],
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            motion: MotionConfig::default(),
            safety: SafetyConfig::default(),
            carriage: CarriageHwConfig::default(),
            interlocks: InterlockHwConfig::default(),
            devices: DEFAULT_DEVICES,
        }
    }
}

impl MachineConfig {
    /// Look up the wiring of one device
    pub fn device(&self, id: u16) -> Option<&DeviceHwConfig> {
        self.devices.get(id as usize).and_then(Option::as_ref)
    }

    /// Check the whole configuration for consistency
    ///
    /// Verifies motion parameters, that id 0 is unpopulated, and that no
    /// pin is claimed by two signals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;

        if self.devices[0].is_some() {
            return Err(ConfigError::ReservedDeviceId);
        }

        let mut used: heapless::Vec<u8, { DEVICE_COUNT * 2 + 6 }> = heapless::Vec::new();
        let fixed = self.carriage.pins().chain(self.interlocks.pins());
        let wired = self.devices.iter().flatten().flat_map(DeviceHwConfig::pins);
        for pin in fixed.chain(wired) {
            if used.contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
            // Capacity covers two pins per device plus the fixed signals
            let _ = used.push(pin);
        }

        Ok(())
    }
}
