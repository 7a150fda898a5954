pub mod error;
pub mod stats;

use tracing::{debug, trace, warn};

use crate::decoder::instructions::{Instruction, Opcode};

pub use error::MachineError;
pub use stats::InstructionMix;

pub const MEMORY_SIZE: usize = 8;

/// Accumulator machine with a tiny shared instruction/data memory.
#[derive(Clone, Debug)]
pub struct Computer {
    accumulator: i32,
    program_counter: usize,
    steps: u64,
    halted: bool,

    ram: [i32; MEMORY_SIZE],
    mix: InstructionMix,
}

impl Default for Computer {
    fn default() -> Self {
        Computer::new()
    }
}

impl Computer {
    pub fn new() -> Computer {
        Computer {
            accumulator: 0,
            program_counter: 0,
            steps: 0,
            halted: false,
            ram: [0; MEMORY_SIZE],
            mix: InstructionMix::default(),
        }
    }

    pub fn with_accumulator(mut self, accumulator: i32) -> Computer {
        self.accumulator = accumulator;
        self
    }

    pub fn load_program(&mut self, machine_code: [i32; MEMORY_SIZE]) {
        self.ram = machine_code
    }

    pub fn accumulator(&self) -> i32 {
        self.accumulator
    }

    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn memory(&self) -> &[i32; MEMORY_SIZE] {
        &self.ram
    }

    pub fn instruction_mix(&self) -> &InstructionMix {
        &self.mix
    }

    /// Steps until HLT. Loops forever on a program that jumps without halting,
    /// and a self-modifying loop keeps adding opcodes to the instruction mix.
    pub fn run(&mut self) -> Result<(), MachineError> {
        while !self.halted {
            self.step()?;
        }

        Ok(())
    }

    /// Executes the instruction under the program counter.
    ///
    /// Once halted this only logs a warning. Errors leave the machine in an
    /// unspecified state and it should not be stepped again.
    pub fn step(&mut self) -> Result<(), MachineError> {
        if self.halted {
            warn!("program halted");
            return Ok(());
        }

        if self.program_counter >= MEMORY_SIZE {
            return Err(MachineError::ProgramCounterOutOfBounds {
                pc: self.program_counter,
            });
        }

        self.steps += 1;

        let opcode = Opcode::decode(self.ram[self.program_counter]);
        self.mix.record(opcode);
        trace!(
            pc = self.program_counter,
            %opcode,
            accumulator = self.accumulator,
            "execute"
        );

        if let Opcode::Known(instruction) = opcode {
            match instruction {
                Instruction::Sta => {
                    let address = self.next_address(instruction)?;
                    self.ram[address] = self.accumulator;
                }
                Instruction::Lda => {
                    let address = self.next_address(instruction)?;
                    self.accumulator = self.ram[address];
                }
                Instruction::Add => {
                    let value = self.next_unchecked(instruction)?;
                    self.accumulator = self.accumulator.wrapping_add(value);
                }
                Instruction::Sub => {
                    let value = self.next_unchecked(instruction)?;
                    self.accumulator = self.accumulator.wrapping_sub(value);
                }
                Instruction::Jmp => {
                    // jumps land exactly on the target, no increment
                    self.program_counter = self.next_address(instruction)?;
                    return Ok(());
                }
                Instruction::Hlt => {
                    self.halted = true;
                    debug!(
                        steps = self.steps,
                        accumulator = self.accumulator,
                        "halted"
                    );
                }
                // OR, AND and the conditional jumps only skip their operand
                stub if stub.consumes_operand() => {
                    self.next()?;
                }
                _ => {}
            }
        }

        self.program_counter += 1;

        Ok(())
    }

    fn next(&mut self) -> Result<i32, MachineError> {
        self.program_counter += 1;

        self.ram
            .get(self.program_counter)
            .copied()
            .ok_or(MachineError::FetchOverflow {
                pc: self.program_counter,
            })
    }

    fn next_address(&mut self, instruction: Instruction) -> Result<usize, MachineError> {
        let address = self.next()?;

        usize::try_from(address)
            .ok()
            .filter(|&address| address < MEMORY_SIZE)
            .ok_or(MachineError::AddressOutOfBounds {
                instruction,
                address,
            })
    }

    /// ADD and SUB take their address on trust: nothing checks it first, and
    /// a cell outside memory reads as 0.
    fn next_unchecked(&mut self, instruction: Instruction) -> Result<i32, MachineError> {
        let address = self.next()?;

        match usize::try_from(address).ok().and_then(|a| self.ram.get(a)) {
            Some(&value) => Ok(value),
            None => {
                warn!(%instruction, address, "operand address outside memory");
                Ok(0)
            }
        }
    }
}
