//! Dispensing devices
//!
//! Every device on the rail is one variant of [`Dispenser`], so a single
//! registry type can own the whole machine without trait objects.

pub mod bridge;
pub mod conveyor;
pub mod optic;
pub mod output;
pub mod pulse;

pub use bridge::{BridgePair, Dasher, Syringe};
pub use conveyor::Conveyor;
pub use optic::Optic;
pub use output::{PulseOutput, TimedOutput};
pub use pulse::{Phase, PulseTrain};

use barbot_core::config::DeviceKind;
use barbot_core::traits::{Device, DeviceStatus};
use barbot_hal::{InputPin, OutputPin, ServoOutput};

/// Stirrer run time per unit of amount (ms)
pub const STIRRER_MS_PER_UNIT: u16 = 100;

/// Any dispensing device
///
/// `O` is the board's output pin type, `I` its input pin type and `S` its
/// servo channel type.
#[derive(Debug)]
pub enum Dispenser<O, I, S> {
    Optic(Optic<S>),
    Mixer(TimedOutput<O>),
    Dasher(Dasher<O>),
    Syringe(Syringe<O>),
    Conveyor(Conveyor<O, I>),
    Slice(PulseOutput<O>),
    Stirrer(TimedOutput<O>),
    Umbrella(PulseOutput<O>),
}

impl<O, I, S> Dispenser<O, I, S> {
    pub const fn kind(&self) -> DeviceKind {
        match self {
            Self::Optic(_) => DeviceKind::Optic,
            Self::Mixer(_) => DeviceKind::Mixer,
            Self::Dasher(_) => DeviceKind::Dasher,
            Self::Syringe(_) => DeviceKind::Syringe,
            Self::Conveyor(_) => DeviceKind::Conveyor,
            Self::Slice(_) => DeviceKind::Slice,
            Self::Stirrer(_) => DeviceKind::Stirrer,
            Self::Umbrella(_) => DeviceKind::Umbrella,
        }
    }
}

macro_rules! each_device {
    ($self:expr, $dev:ident => $body:expr) => {
        match $self {
            Dispenser::Optic($dev) => $body,
            Dispenser::Mixer($dev) | Dispenser::Stirrer($dev) => $body,
            Dispenser::Dasher($dev) => $body,
            Dispenser::Syringe($dev) => $body,
            Dispenser::Conveyor($dev) => $body,
            Dispenser::Slice($dev) | Dispenser::Umbrella($dev) => $body,
        }
    };
}

impl<O: OutputPin, I: InputPin, S: ServoOutput> Device for Dispenser<O, I, S> {
    fn start(&mut self, amount: u16, now_ms: u32) {
        each_device!(self, dev => dev.start(amount, now_ms))
    }

    fn stop(&mut self) {
        each_device!(self, dev => dev.stop())
    }

    fn poll(&mut self, now_ms: u32) {
        each_device!(self, dev => dev.poll(now_ms))
    }

    fn status(&self) -> DeviceStatus {
        each_device!(self, dev => dev.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{SharedPin, SharedServo};
    use barbot_hal::gpio::ActiveOutput;
    use barbot_hal::ActiveLevel;
    use core::cell::Cell;

    type TestDispenser<'a> = Dispenser<SharedPin<'a>, SharedPin<'a>, SharedServo<'a>>;

    #[test]
    fn test_stirrer_runs_hundred_ms_per_unit() {
        let motor = Cell::new(false);
        let mut stirrer: TestDispenser<'_> = Dispenser::Stirrer(TimedOutput::new(
            ActiveOutput::new(SharedPin(&motor), ActiveLevel::High),
            STIRRER_MS_PER_UNIT,
        ));
        assert_eq!(stirrer.kind(), DeviceKind::Stirrer);

        stirrer.start(5, 0);
        stirrer.poll(499);
        assert!(motor.get());
        assert_eq!(stirrer.status(), DeviceStatus::Busy);
        stirrer.poll(500);
        assert!(!motor.get());
        assert!(stirrer.is_idle());
    }

    #[test]
    fn test_optic_through_enum() {
        let angle = Cell::new(0);
        let mut optic: TestDispenser<'_> =
            Dispenser::Optic(Optic::new(SharedServo(&angle), 65, 10, 3000, 2000));

        optic.start(1, 0);
        assert_eq!(angle.get(), 10);
        optic.stop();
        assert_eq!(angle.get(), 65);
        assert!(optic.is_idle());
    }
}
