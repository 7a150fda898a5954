use std::fmt;

use smallvec::SmallVec;

use crate::computer::{Computer, MEMORY_SIZE};
use crate::decoder::instructions::{Instruction, Opcode};

pub type Dump = SmallVec<[DumpLine; MEMORY_SIZE]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DumpLine {
    Instruction {
        address: usize,
        value: i32,
        instruction: Instruction,
    },
    Operand {
        address: usize,
        value: i32,
    },
    Data {
        address: usize,
        value: i32,
    },
}

impl fmt::Display for DumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpLine::Instruction {
                address,
                value,
                instruction,
            } => write!(f, "{address:02}: {value} ({instruction})"),
            DumpLine::Operand { address, value } => write!(f, "{address:02}: ~ {value}"),
            DumpLine::Data { address, value } => write!(f, "{address:02}: {value}"),
        }
    }
}

/// Splits memory into instruction, operand and data lines.
///
/// The split is guessed from cell values alone, so a data cell that happens
/// to hold an operand-taking opcode swallows the cell after it.
pub fn disassemble(memory: &[i32]) -> Dump {
    let mut lines = Dump::new();
    let mut address = 0;

    while address < memory.len() {
        let value = memory[address];

        match Opcode::decode(value) {
            Opcode::Known(instruction) => {
                lines.push(DumpLine::Instruction {
                    address,
                    value,
                    instruction,
                });

                if instruction.consumes_operand() && address + 1 < memory.len() {
                    address += 1;
                    lines.push(DumpLine::Operand {
                        address,
                        value: memory[address],
                    });
                }
            }
            Opcode::Unknown(_) => lines.push(DumpLine::Data { address, value }),
        }

        address += 1;
    }

    lines
}

/// Final machine state as printed after a halt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub dump: Dump,
    pub accumulator: i32,
    pub program_counter: usize,
    pub steps: u64,
}

impl Report {
    pub fn capture(computer: &Computer) -> Report {
        Report {
            dump: disassemble(computer.memory()),
            accumulator: computer.accumulator(),
            program_counter: computer.program_counter(),
            steps: computer.steps(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.dump {
            writeln!(f, "{line}")?;
        }

        writeln!(f)?;
        writeln!(f, "accumulator: {}", self.accumulator)?;
        writeln!(f, "program counter: {}", self.program_counter)?;
        write!(f, "steps: {}", self.steps)
    }
}
