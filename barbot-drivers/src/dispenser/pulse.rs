//! Pulse train timing
//!
//! Most dispensers are a fixed number of on/off cycles on one or two
//! outputs. This helper does the timing; the device decides what "on" and
//! "off" mean for its pins.
//!
//! A cycle is an on phase followed by an off phase. The device stays busy
//! through the off phase of the last cycle, so settle and refill time is
//! included before it reports idle.

/// Current phase of the train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Not running
    Idle,
    /// Active half of a cycle
    On,
    /// Passive half of a cycle
    Off,
}

/// Counted on/off timer
#[derive(Debug, Clone)]
pub struct PulseTrain {
    on_ms: u32,
    off_ms: u32,
    /// Cycles left, including the one in progress
    remaining: u16,
    phase: Phase,
    since_ms: u32,
}

impl PulseTrain {
    /// Create an idle train
    pub const fn new(on_ms: u32, off_ms: u32) -> Self {
        Self {
            on_ms,
            off_ms,
            remaining: 0,
            phase: Phase::Idle,
            since_ms: 0,
        }
    }

    /// Change the phase durations for the next start
    pub fn set_timing(&mut self, on_ms: u32, off_ms: u32) {
        self.on_ms = on_ms;
        self.off_ms = off_ms;
    }

    /// Begin `cycles` cycles; zero cycles leaves the train idle
    pub fn start(&mut self, cycles: u16, now_ms: u32) -> Phase {
        self.remaining = cycles;
        self.since_ms = now_ms;
        self.phase = if cycles == 0 { Phase::Idle } else { Phase::On };
        self.phase
    }

    /// Advance to the phase due at `now_ms`
    ///
    /// Each phase lasts at least its duration from when it was entered;
    /// late polls stretch a phase rather than skipping one.
    pub fn poll(&mut self, now_ms: u32) -> Phase {
        loop {
            let elapsed = now_ms.wrapping_sub(self.since_ms);
            let next = match self.phase {
                Phase::Idle => return Phase::Idle,
                Phase::On if elapsed >= self.on_ms => Phase::Off,
                Phase::Off if elapsed >= self.off_ms => {
                    self.remaining = self.remaining.saturating_sub(1);
                    if self.remaining == 0 {
                        Phase::Idle
                    } else {
                        Phase::On
                    }
                }
                phase => return phase,
            };
            self.phase = next;
            self.since_ms = now_ms;
        }
    }

    /// Abort immediately
    pub fn stop(&mut self) {
        self.remaining = 0;
        self.phase = Phase::Idle;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Cycles left, including the one in progress
    pub fn remaining(&self) -> u16 {
        self.remaining
    }
}
