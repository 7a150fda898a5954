use thiserror::Error;

use crate::decoder::instructions::Instruction;

/// Bounds violations that stop the machine for good.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("fatal: program counter out of bounds ({pc})")]
    ProgramCounterOutOfBounds { pc: usize },
    #[error("fatal: program counter out of bounds while fetching operand ({pc})")]
    FetchOverflow { pc: usize },
    #[error("{instruction}: address {address} out of bounds")]
    AddressOutOfBounds {
        instruction: Instruction,
        address: i32,
    },
}
