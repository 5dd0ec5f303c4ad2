//! Two-direction actuators driven through an H-bridge
//!
//! A dasher tips its bottle forward and back once per dash. A syringe pump
//! extends for the requested volume and then retracts by the same amount to
//! reload.

use barbot_core::traits::{Device, DeviceStatus};
use barbot_hal::gpio::ActiveOutput;
use barbot_hal::OutputPin;

use super::pulse::{Phase, PulseTrain};

/// Pair of outputs that must never be asserted together
#[derive(Debug)]
pub struct BridgePair<O> {
    forward: ActiveOutput<O>,
    reverse: ActiveOutput<O>,
}

impl<O: OutputPin> BridgePair<O> {
    pub fn new(forward: ActiveOutput<O>, reverse: ActiveOutput<O>) -> Self {
        let mut pair = Self { forward, reverse };
        pair.apply(Phase::Idle);
        pair
    }

    /// `On` drives forward, `Off` drives reverse, `Idle` releases both.
    /// The side being released is always dropped first.
    fn apply(&mut self, phase: Phase) {
        match phase {
            Phase::On => {
                self.reverse.set_active(false);
                self.forward.set_active(true);
            }
            Phase::Off => {
                self.forward.set_active(false);
                self.reverse.set_active(true);
            }
            Phase::Idle => {
                self.forward.set_active(false);
                self.reverse.set_active(false);
            }
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward.is_active()
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse.is_active()
    }
}

/// Bitters dasher: `amount` tip/return strokes
#[derive(Debug)]
pub struct Dasher<O> {
    bridge: BridgePair<O>,
    train: PulseTrain,
}

impl<O: OutputPin> Dasher<O> {
    pub fn new(tip: ActiveOutput<O>, back: ActiveOutput<O>, stroke_ms: u16) -> Self {
        let stroke = u32::from(stroke_ms);
        Self {
            bridge: BridgePair::new(tip, back),
            train: PulseTrain::new(stroke, stroke),
        }
    }

    pub fn bridge(&self) -> &BridgePair<O> {
        &self.bridge
    }
}

/// Syringe pump: extend `amount` units, then retract to reload
#[derive(Debug)]
pub struct Syringe<O> {
    bridge: BridgePair<O>,
    ms_per_unit: u32,
    train: PulseTrain,
}

impl<O: OutputPin> Syringe<O> {
    pub fn new(extend: ActiveOutput<O>, retract: ActiveOutput<O>, ms_per_unit: u16) -> Self {
        Self {
            bridge: BridgePair::new(extend, retract),
            ms_per_unit: u32::from(ms_per_unit),
            train: PulseTrain::new(0, 0),
        }
    }

    pub fn bridge(&self) -> &BridgePair<O> {
        &self.bridge
    }
}

fn bridge_status(train: &PulseTrain) -> DeviceStatus {
    if train.is_busy() {
        DeviceStatus::Busy
    } else {
        DeviceStatus::Idle
    }
}

impl<O: OutputPin> Device for Dasher<O> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        let phase = self.train.start(amount, now_ms);
        self.bridge.apply(phase);
    }

    fn stop(&mut self) {
        self.train.stop();
        self.bridge.apply(Phase::Idle);
    }

    fn poll(&mut self, now_ms: u32) {
        let phase = self.train.poll(now_ms);
        self.bridge.apply(phase);
    }

    fn status(&self) -> DeviceStatus {
        bridge_status(&self.train)
    }
}

impl<O: OutputPin> Device for Syringe<O> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        let travel = u32::from(amount) * self.ms_per_unit;
        self.train.set_timing(travel, travel);
        let phase = self.train.start(u16::from(amount > 0), now_ms);
        self.bridge.apply(phase);
    }

    fn stop(&mut self) {
        self.train.stop();
        self.bridge.apply(Phase::Idle);
    }

    fn poll(&mut self, now_ms: u32) {
        let phase = self.train.poll(now_ms);
        self.bridge.apply(phase);
    }

    fn status(&self) -> DeviceStatus {
        bridge_status(&self.train)
    }
}
