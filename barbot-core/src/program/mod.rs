//! Program model
//!
//! A program is a bounded, ordered list of [`Instruction`]s authored by the
//! operator. The sequencer owns it and only allows edits while not running.

mod instruction;

pub use instruction::{Instruction, Opcode};

use heapless::Vec;

use crate::config::MAX_INSTRUCTIONS;

/// Returned by [`Program::push`] when capacity is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgramFull;

/// Fixed-capacity instruction list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction, MAX_INSTRUCTIONS>,
}

impl Program {
    /// Create an empty program
    pub const fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// Append an instruction
    pub fn push(&mut self, instruction: Instruction) -> Result<(), ProgramFull> {
        self.instructions.push(instruction).map_err(|_| ProgramFull)
    }

    /// Remove every instruction
    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// Instruction at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.instructions.is_full()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }
}
