//! Conveyor: motor plus slot index sensor
//!
//! `start(n)` runs the belt until `n` index pulses (rising edges of the
//! sensor) have been counted. A slot that takes longer than the configured
//! timeout stops the belt and drops the device back to idle, flagging the
//! timeout so a supervisor can inspect it.

use barbot_core::traits::{Device, DeviceStatus};
use barbot_hal::gpio::{ActiveInput, ActiveOutput};
use barbot_hal::{InputPin, OutputPin};

/// Conveyor dispenser
#[derive(Debug)]
pub struct Conveyor<O, I> {
    motor: ActiveOutput<O>,
    index: ActiveInput<I>,
    slot_timeout_ms: u32,
    remaining: u16,
    last_index: bool,
    slot_start_ms: u32,
    timed_out: bool,
}

impl<O: OutputPin, I: InputPin> Conveyor<O, I> {
    pub fn new(motor: ActiveOutput<O>, index: ActiveInput<I>, slot_timeout_ms: u16) -> Self {
        Self {
            motor,
            index,
            slot_timeout_ms: u32::from(slot_timeout_ms),
            remaining: 0,
            last_index: false,
            slot_start_ms: 0,
            timed_out: false,
        }
    }

    /// Slots still to pass
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Whether the last run was cut short by a slot timeout
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn is_running(&self) -> bool {
        self.motor.is_active()
    }

    fn halt(&mut self) {
        self.remaining = 0;
        self.motor.set_active(false);
    }
}

impl<O: OutputPin, I: InputPin> Device for Conveyor<O, I> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        self.timed_out = false;
        self.remaining = amount;
        self.last_index = self.index.is_asserted();
        self.slot_start_ms = now_ms;
        self.motor.set_active(amount > 0);
    }

    fn stop(&mut self) {
        self.halt();
    }

    fn poll(&mut self, now_ms: u32) {
        if self.remaining == 0 {
            return;
        }

        let index = self.index.is_asserted();
        let rising = index && !self.last_index;
        self.last_index = index;

        if rising {
            self.remaining -= 1;
            self.slot_start_ms = now_ms;
            if self.remaining == 0 {
                self.motor.set_active(false);
            }
        } else if now_ms.wrapping_sub(self.slot_start_ms) > self.slot_timeout_ms {
            #[cfg(feature = "defmt")]
            defmt::warn!("Conveyor slot timeout with {} slots left", self.remaining);
            self.timed_out = true;
            self.halt();
        }
    }

    fn status(&self) -> DeviceStatus {
        if self.remaining > 0 {
            DeviceStatus::Busy
        } else {
            DeviceStatus::Idle
        }
    }
}
