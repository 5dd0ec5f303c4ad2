//! BarBot Hardware Abstraction Layer
//!
//! This crate defines the pin-level traits the drivers are written against.
//! Board support code implements them directly, or wraps any `embedded-hal`
//! 1.0 pin or PWM channel with the adapters in [`adapter`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  barbot-core (sequencer, safety)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  barbot-drivers (devices, stepper)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  barbot-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  any embedded-hal 1.0 BSP               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`servo::ServoOutput`] - Hobby servo position output

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod gpio;
pub mod servo;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLevel, InputPin, OutputPin};
pub use servo::ServoOutput;
