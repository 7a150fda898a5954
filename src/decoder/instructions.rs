use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instruction {
    Nop,
    Sta,
    Lda,
    Add,
    Or,
    And,
    Not,
    Sub,
    Jmp,
    Jn,
    Jp,
    Jv,
    Jnv,
    Jz,
    Jnz,
    Jc,
    Jnc,
    Jb,
    Jnb,
    Shr,
    Shl,
    Ror,
    Rol,
    Hlt,
}

pub static INSTRUCTION: phf::Map<&'static str, Instruction> = phf_map! {
    "NOP" => Instruction::Nop,
    "STA" => Instruction::Sta,
    "LDA" => Instruction::Lda,
    "ADD" => Instruction::Add,
    "OR" => Instruction::Or,
    "AND" => Instruction::And,
    "NOT" => Instruction::Not,
    "SUB" => Instruction::Sub,
    "JMP" => Instruction::Jmp,
    "JN" => Instruction::Jn,
    "JP" => Instruction::Jp,
    "JV" => Instruction::Jv,
    "JNV" => Instruction::Jnv,
    "JZ" => Instruction::Jz,
    "JNZ" => Instruction::Jnz,
    "JC" => Instruction::Jc,
    "JNC" => Instruction::Jnc,
    "JB" => Instruction::Jb,
    "JNB" => Instruction::Jnb,
    "SHR" => Instruction::Shr,
    "SHL" => Instruction::Shl,
    "ROR" => Instruction::Ror,
    "ROL" => Instruction::Rol,
    "HLT" => Instruction::Hlt
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown mnemonic `{0}`")]
pub struct UnknownMnemonic(pub String);

impl Instruction {
    pub const ALL: [Instruction; 24] = [
        Instruction::Nop,
        Instruction::Sta,
        Instruction::Lda,
        Instruction::Add,
        Instruction::Or,
        Instruction::And,
        Instruction::Not,
        Instruction::Sub,
        Instruction::Jmp,
        Instruction::Jn,
        Instruction::Jp,
        Instruction::Jv,
        Instruction::Jnv,
        Instruction::Jz,
        Instruction::Jnz,
        Instruction::Jc,
        Instruction::Jnc,
        Instruction::Jb,
        Instruction::Jnb,
        Instruction::Shr,
        Instruction::Shl,
        Instruction::Ror,
        Instruction::Rol,
        Instruction::Hlt,
    ];

    /// Encoded cell value of this instruction.
    pub fn value(self) -> i32 {
        match self {
            Instruction::Nop => 0x00,
            Instruction::Sta => 0x10,
            Instruction::Lda => 0x20,
            Instruction::Add => 0x30,
            Instruction::Or => 0x40,
            Instruction::And => 0x50,
            Instruction::Not => 0x60,
            Instruction::Sub => 0x70,
            Instruction::Jmp => 0x80,
            Instruction::Jn => 0x90,
            Instruction::Jp => 0x94,
            Instruction::Jv => 0x98,
            Instruction::Jnv => 0x9C,
            Instruction::Jz => 0xA0,
            Instruction::Jnz => 0xA4,
            Instruction::Jc => 0xB0,
            Instruction::Jnc => 0xB4,
            Instruction::Jb => 0xB8,
            Instruction::Jnb => 0xBC,
            Instruction::Shr => 0xE0,
            Instruction::Shl => 0xE1,
            Instruction::Ror => 0xE2,
            Instruction::Rol => 0xE3,
            Instruction::Hlt => 0xF0,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Instruction::Nop => "NOP",
            Instruction::Sta => "STA",
            Instruction::Lda => "LDA",
            Instruction::Add => "ADD",
            Instruction::Or => "OR",
            Instruction::And => "AND",
            Instruction::Not => "NOT",
            Instruction::Sub => "SUB",
            Instruction::Jmp => "JMP",
            Instruction::Jn => "JN",
            Instruction::Jp => "JP",
            Instruction::Jv => "JV",
            Instruction::Jnv => "JNV",
            Instruction::Jz => "JZ",
            Instruction::Jnz => "JNZ",
            Instruction::Jc => "JC",
            Instruction::Jnc => "JNC",
            Instruction::Jb => "JB",
            Instruction::Jnb => "JNB",
            Instruction::Shr => "SHR",
            Instruction::Shl => "SHL",
            Instruction::Ror => "ROR",
            Instruction::Rol => "ROL",
            Instruction::Hlt => "HLT",
        }
    }

    /// Whether executing this instruction reads the cell right after it.
    ///
    /// NOT, the shifts/rotates and HLT stand alone; everything else between
    /// STA and JNB takes one operand, even where the operand is ignored.
    pub fn consumes_operand(self) -> bool {
        !matches!(
            self,
            Instruction::Nop
                | Instruction::Not
                | Instruction::Shr
                | Instruction::Shl
                | Instruction::Ror
                | Instruction::Rol
                | Instruction::Hlt
        )
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Instruction> {
        INSTRUCTION
            .get(mnemonic.to_ascii_uppercase().as_str())
            .copied()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Instruction {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instruction::from_mnemonic(s).ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

/// A memory cell read as an opcode.
///
/// Decoding never fails: values outside the table come back as `Unknown`
/// and execute like NOP.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    Known(Instruction),
    Unknown(i32),
}

impl Opcode {
    pub fn decode(cell: i32) -> Opcode {
        Instruction::ALL
            .into_iter()
            .find(|instruction| instruction.value() == cell)
            .map_or(Opcode::Unknown(cell), Opcode::Known)
    }

    pub fn mnemonic(self) -> Option<&'static str> {
        match self {
            Opcode::Known(instruction) => Some(instruction.mnemonic()),
            Opcode::Unknown(_) => None,
        }
    }

    pub fn consumes_operand(self) -> bool {
        match self {
            Opcode::Known(instruction) => instruction.consumes_operand(),
            Opcode::Unknown(_) => false,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Known(instruction) => fmt::Display::fmt(instruction, f),
            Opcode::Unknown(raw) => write!(f, "{raw:#04X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_value_for_every_instruction() {
        for instruction in Instruction::ALL {
            assert_eq!(
                Opcode::decode(instruction.value()),
                Opcode::Known(instruction)
            );
        }
    }

    #[test]
    fn mnemonic_table_covers_every_instruction() {
        assert_eq!(INSTRUCTION.len(), Instruction::ALL.len());
        for instruction in Instruction::ALL {
            assert_eq!(INSTRUCTION.get(instruction.mnemonic()), Some(&instruction));
        }
    }

    #[test]
    fn values_outside_the_table_decode_as_unknown() {
        for raw in [0xFF, 0x01, 0x91, -0x10, 0x100] {
            assert_eq!(Opcode::decode(raw), Opcode::Unknown(raw));
            assert_eq!(Opcode::decode(raw).mnemonic(), None);
        }
        assert_eq!(Opcode::decode(0x20).mnemonic(), Some("LDA"));
    }

    #[test]
    fn parses_mnemonics_case_insensitively() {
        assert_eq!("lda".parse::<Instruction>(), Ok(Instruction::Lda));
        assert_eq!("JnB".parse::<Instruction>(), Ok(Instruction::Jnb));
        assert_eq!(
            "XYZ".parse::<Instruction>(),
            Err(UnknownMnemonic("XYZ".to_string()))
        );
    }

    #[test]
    fn operand_consumers() {
        let consuming: Vec<_> = Instruction::ALL
            .into_iter()
            .filter(|i| i.consumes_operand())
            .map(Instruction::mnemonic)
            .collect();

        assert_eq!(
            consuming,
            [
                "STA", "LDA", "ADD", "OR", "AND", "SUB", "JMP", "JN", "JP", "JV", "JNV", "JZ",
                "JNZ", "JC", "JNC", "JB", "JNB"
            ]
        );
        assert!(!Opcode::Unknown(0xFF).consumes_operand());
    }
}
