//! Configuration types
//!
//! Board-agnostic configuration structures, optionally stored as postcard
//! binary data.

pub mod hardware;
#[cfg(feature = "serde")]
pub mod storage;
pub mod types;

pub use hardware::*;
pub use types::*;
