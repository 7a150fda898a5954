pub mod disassembler;
pub mod instructions;
