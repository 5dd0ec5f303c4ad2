//! Persisted configuration
//!
//! A [`MachineConfig`] is written to flash as a postcard blob behind a
//! magic number. Loading checks magic, version and consistency before the
//! configuration is handed to the rest of the firmware.

use serde::{Deserialize, Serialize};

use super::types::{ConfigError, MachineConfig, CONFIG_VERSION};

/// Magic number to identify a stored configuration
pub const CONFIG_MAGIC: u32 = 0x4242_4F54; // "BBOT"

#[derive(Serialize)]
struct StoredRef<'a> {
    magic: u32,
    config: &'a MachineConfig,
}

#[derive(Deserialize)]
struct Stored {
    magic: u32,
    config: MachineConfig,
}

impl MachineConfig {
    /// Serialize into `buf`, returning the used prefix
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        let stored = StoredRef {
            magic: CONFIG_MAGIC,
            config: self,
        };
        postcard::to_slice(&stored, buf).map_err(|_| ConfigError::Encoding)
    }

    /// Deserialize and validate a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let stored: Stored = postcard::from_bytes(bytes).map_err(|_| ConfigError::Encoding)?;
        if stored.magic != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic);
        }
        if stored.config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch(stored.config.version));
        }
        stored.config.validate()?;
        Ok(stored.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_load() {
        let mut config = MachineConfig::default();
        config.safety.container_sensing = false;
        config.motion.move_timeout_ms = 25_000;

        let mut buf = [0u8; 512];
        let used = config.to_slice(&mut buf).unwrap().len();
        let loaded = MachineConfig::from_bytes(&buf[..used]).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_blank_flash_rejected() {
        let buf = [0xFFu8; 64];
        assert!(MachineConfig::from_bytes(&buf).is_err());
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut config = MachineConfig::default();
        config.version = CONFIG_VERSION + 1;

        let mut buf = [0u8; 512];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            MachineConfig::from_bytes(&buf[..used]),
            Err(ConfigError::VersionMismatch(CONFIG_VERSION + 1))
        );
    }

    #[test]
    fn test_invalid_config_rejected_on_load() {
        let mut config = MachineConfig::default();
        config.motion.reset_position = 0;

        let mut buf = [0u8; 512];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            MachineConfig::from_bytes(&buf[..used]),
            Err(ConfigError::ResetInsideRail)
        );
    }

    #[test]
    fn test_small_buffer_reports_encoding_error() {
        let config = MachineConfig::default();
        let mut buf = [0u8; 4];
        assert_eq!(config.to_slice(&mut buf).err(), Some(ConfigError::Encoding));
    }
}
