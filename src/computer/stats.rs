use ahash::AHashMap;

use crate::decoder::instructions::Opcode;

/// How many times each opcode was executed.
///
/// One entry per distinct cell value run as an opcode, so it is only bounded
/// by what the program writes into the cells it executes.
#[derive(Clone, Debug, Default)]
pub struct InstructionMix {
    counts: AHashMap<Opcode, u64>,
}

impl InstructionMix {
    pub fn record(&mut self, opcode: Opcode) {
        *self.counts.entry(opcode).or_insert(0) += 1;
    }

    pub fn count(&self, opcode: Opcode) -> u64 {
        self.counts.get(&opcode).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Counts in opcode order, known instructions first.
    pub fn sorted(&self) -> Vec<(Opcode, u64)> {
        let mut counts: Vec<_> = self.counts.iter().map(|(&op, &n)| (op, n)).collect();
        counts.sort_unstable_by_key(|&(op, _)| op);
        counts
    }
}
