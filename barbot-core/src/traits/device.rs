//! Dispensing device trait
//!
//! Every ingredient device exposes the same non-blocking contract. The
//! sequencer starts a device, then polls it once per tick until it reports
//! idle again.

/// Coarse device status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStatus {
    /// Not dispensing; ready for `start`
    #[default]
    Idle,
    /// An action is in progress
    Busy,
}

/// Dispensing device
pub trait Device {
    /// Begin a non-blocking dispense of the given magnitude
    ///
    /// The unit is device-specific (measures, millilitres, dashes, slots).
    /// `start(0)` completes immediately.
    ///
    /// # Arguments
    /// * `amount` - Dispense magnitude
    /// * `now_ms` - Timestamp of the current tick
    fn start(&mut self, amount: u16, now_ms: u32);

    /// Abort immediately and release all outputs
    ///
    /// Safe to call at any time, including when already idle.
    fn stop(&mut self);

    /// Advance internal timing
    ///
    /// Called every control tick regardless of machine state, so a device
    /// can finish or time out on its own while the sequencer is faulted.
    fn poll(&mut self, now_ms: u32);

    /// Current status
    fn status(&self) -> DeviceStatus;

    /// Convenience check for [`DeviceStatus::Idle`]
    fn is_idle(&self) -> bool {
        self.status() == DeviceStatus::Idle
    }
}
