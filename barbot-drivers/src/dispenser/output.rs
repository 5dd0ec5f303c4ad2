//! Single-output dispensers
//!
//! [`TimedOutput`] holds one output on for a time proportional to the
//! amount (pressure mixer valve, stirrer motor). [`PulseOutput`] emits a
//! counted train of pulses (slice dispenser, umbrella dropper).

use barbot_core::traits::{Device, DeviceStatus};
use barbot_hal::gpio::ActiveOutput;
use barbot_hal::OutputPin;

use super::pulse::{Phase, PulseTrain};

/// Output held on for `amount × ms_per_unit`
#[derive(Debug)]
pub struct TimedOutput<O> {
    output: ActiveOutput<O>,
    ms_per_unit: u32,
    train: PulseTrain,
}

impl<O: OutputPin> TimedOutput<O> {
    pub fn new(output: ActiveOutput<O>, ms_per_unit: u16) -> Self {
        Self {
            output,
            ms_per_unit: u32::from(ms_per_unit),
            train: PulseTrain::new(0, 0),
        }
    }

    pub fn is_on(&self) -> bool {
        self.output.is_active()
    }
}

impl<O: OutputPin> Device for TimedOutput<O> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        self.train
            .set_timing(u32::from(amount) * self.ms_per_unit, 0);
        let phase = self.train.start(u16::from(amount > 0), now_ms);
        self.output.set_active(phase == Phase::On);
    }

    fn stop(&mut self) {
        self.train.stop();
        self.output.set_active(false);
    }

    fn poll(&mut self, now_ms: u32) {
        let phase = self.train.poll(now_ms);
        self.output.set_active(phase == Phase::On);
    }

    fn status(&self) -> DeviceStatus {
        if self.train.is_busy() {
            DeviceStatus::Busy
        } else {
            DeviceStatus::Idle
        }
    }
}

/// Output pulsed `amount` times
#[derive(Debug)]
pub struct PulseOutput<O> {
    output: ActiveOutput<O>,
    train: PulseTrain,
}

impl<O: OutputPin> PulseOutput<O> {
    pub fn new(output: ActiveOutput<O>, on_ms: u16, off_ms: u16) -> Self {
        Self {
            output,
            train: PulseTrain::new(u32::from(on_ms), u32::from(off_ms)),
        }
    }

    pub fn is_on(&self) -> bool {
        self.output.is_active()
    }
}

impl<O: OutputPin> Device for PulseOutput<O> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        let phase = self.train.start(amount, now_ms);
        self.output.set_active(phase == Phase::On);
    }

    fn stop(&mut self) {
        self.train.stop();
        self.output.set_active(false);
    }

    fn poll(&mut self, now_ms: u32) {
        let phase = self.train.poll(now_ms);
        self.output.set_active(phase == Phase::On);
    }

    fn status(&self) -> DeviceStatus {
        if self.train.is_busy() {
            DeviceStatus::Busy
        } else {
            DeviceStatus::Idle
        }
    }
}
