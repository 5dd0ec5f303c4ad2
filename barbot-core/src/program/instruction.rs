//! Instruction encoding

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Instruction opcode
///
/// Discriminants match the numbering used by the command link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// Do nothing; completes immediately
    #[default]
    Nop = 0,
    /// Move the carriage to `param1`
    Move = 1,
    /// Dispense `param2` from device `param1`
    Dispense = 2,
    /// Pause for `param1` milliseconds
    Wait = 3,
    /// Home the carriage against the limit switch
    Zero = 4,
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Nop),
            1 => Ok(Opcode::Move),
            2 => Ok(Opcode::Dispense),
            3 => Ok(Opcode::Wait),
            4 => Ok(Opcode::Zero),
            other => Err(other),
        }
    }
}

/// One program step
///
/// Parameter meaning depends on the opcode; unused parameters are carried
/// but ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instruction {
    pub opcode: Opcode,
    pub param1: u16,
    pub param2: u16,
}

impl Instruction {
    pub const fn new(opcode: Opcode, param1: u16, param2: u16) -> Self {
        Self {
            opcode,
            param1,
            param2,
        }
    }

    pub const fn nop() -> Self {
        Self::new(Opcode::Nop, 0, 0)
    }

    /// Move the carriage to an absolute rail position
    pub const fn move_to(position: u16) -> Self {
        Self::new(Opcode::Move, position, 0)
    }

    /// Dispense `amount` from device `id`
    pub const fn dispense(id: u16, amount: u16) -> Self {
        Self::new(Opcode::Dispense, id, amount)
    }

    /// Pause for `ms` milliseconds
    pub const fn wait(ms: u16) -> Self {
        Self::new(Opcode::Wait, ms, 0)
    }

    /// Home the carriage
    pub const fn zero() -> Self {
        Self::new(Opcode::Zero, 0, 0)
    }
}
