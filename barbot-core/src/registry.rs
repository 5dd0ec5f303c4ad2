//! Device registry
//!
//! Fixed-size table of dispensing devices indexed by their external id.
//! Slot 0 is reserved and always empty so ids match the numbering used by
//! the recipe database.

use crate::config::DEVICE_COUNT;
use crate::traits::{Device, DeviceStatus};

/// Error returned when populating the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Id 0 is reserved
    ReservedId,
    /// Id outside the table
    OutOfRange(u16),
}

/// Owns every dispensing device for the life of the firmware
#[derive(Debug)]
pub struct DeviceRegistry<D> {
    slots: [Option<D>; DEVICE_COUNT],
}

impl<D> Default for DeviceRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DeviceRegistry<D> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Build a registry by asking for the device behind each id
    ///
    /// The closure is never called for the reserved id 0.
    pub fn from_fn(mut f: impl FnMut(u16) -> Option<D>) -> Self {
        Self {
            slots: core::array::from_fn(|id| if id == 0 { None } else { f(id as u16) }),
        }
    }

    /// Whether `id` may be named by a DISPENSE instruction
    pub const fn is_valid_id(id: u16) -> bool {
        (id as usize) < DEVICE_COUNT
    }

    /// Install a device, returning any device previously in the slot
    pub fn insert(&mut self, id: u16, device: D) -> Result<Option<D>, RegistryError> {
        if id == 0 {
            return Err(RegistryError::ReservedId);
        }
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(RegistryError::OutOfRange(id))?;
        Ok(slot.replace(device))
    }

    pub fn get(&self, id: u16) -> Option<&D> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: u16) -> Option<&mut D> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated slots with their ids
    pub fn iter(&self) -> impl Iterator<Item = (u16, &D)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|d| (id as u16, d)))
    }
}

impl<D: Device> DeviceRegistry<D> {
    /// Start a dispense
    ///
    /// # Returns
    /// `false` if no device is installed at `id`; the caller treats that as
    /// an instantly complete dispense
    pub fn start(&mut self, id: u16, amount: u16, now_ms: u32) -> bool {
        match self.get_mut(id) {
            Some(device) => {
                device.start(amount, now_ms);
                true
            }
            None => false,
        }
    }

    /// Status of the device at `id`, `None` if the slot is empty
    pub fn status(&self, id: u16) -> Option<DeviceStatus> {
        self.get(id).map(Device::status)
    }

    /// Advance every device's timing
    pub fn poll_all(&mut self, now_ms: u32) {
        for device in self.slots.iter_mut().flatten() {
            device.poll(now_ms);
        }
    }

    /// Abort every device
    pub fn stop_all(&mut self) {
        for device in self.slots.iter_mut().flatten() {
            device.stop();
        }
    }

    /// Whether every installed device is idle
    pub fn all_idle(&self) -> bool {
        self.slots.iter().flatten().all(Device::is_idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;

    #[test]
    fn test_reserved_and_out_of_range_ids() {
        let mut registry = DeviceRegistry::new();
        assert_eq!(
            registry.insert(0, MockDevice::new(10)).err(),
            Some(RegistryError::ReservedId)
        );
        assert_eq!(
            registry.insert(21, MockDevice::new(10)).err(),
            Some(RegistryError::OutOfRange(21))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_valid_ids() {
        assert!(DeviceRegistry::<MockDevice>::is_valid_id(0));
        assert!(DeviceRegistry::<MockDevice>::is_valid_id(20));
        assert!(!DeviceRegistry::<MockDevice>::is_valid_id(21));
    }

    #[test]
    fn test_from_fn_skips_reserved_slot() {
        let registry = DeviceRegistry::from_fn(|id| (id % 2 == 0).then(|| MockDevice::new(10)));
        assert!(registry.get(0).is_none());
        assert!(registry.get(2).is_some());
        assert!(registry.get(3).is_none());
        assert_eq!(registry.len(), 10);
        assert!(registry.iter().all(|(id, _)| id % 2 == 0 && id != 0));
    }

    #[test]
    fn test_start_absent_device() {
        let mut registry: DeviceRegistry<MockDevice> = DeviceRegistry::new();
        assert!(!registry.start(5, 10, 0));
        assert_eq!(registry.status(5), None);
    }

    #[test]
    fn test_poll_and_stop_reach_every_device() {
        let mut registry = DeviceRegistry::from_fn(|_| Some(MockDevice::new(100)));
        assert!(registry.start(3, 2, 0));
        assert_eq!(registry.status(3), Some(DeviceStatus::Busy));
        assert!(!registry.all_idle());

        registry.poll_all(50);
        assert!(registry.iter().all(|(_, d)| d.polls == 1));
        assert_eq!(registry.status(3), Some(DeviceStatus::Busy));

        registry.stop_all();
        assert!(registry.iter().all(|(_, d)| d.stops == 1));
        assert!(registry.all_idle());
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut registry = DeviceRegistry::new();
        assert!(registry.insert(4, MockDevice::new(1)).unwrap().is_none());
        let previous = registry.insert(4, MockDevice::new(2)).unwrap();
        assert_eq!(previous.map(|d| d.duration_ms), Some(1));
        assert_eq!(registry.get(4).map(|d| d.duration_ms), Some(2));
    }
}
