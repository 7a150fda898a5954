use ahmes::computer::{Computer, MEMORY_SIZE};
use ahmes::decoder::disassembler::Report;
use ahmes::decoder::instructions::Instruction;

use eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut computer = Computer::new().with_accumulator(30);
    computer.load_program(program());
    computer.run()?;

    for (opcode, count) in computer.instruction_mix().sorted() {
        debug!(%opcode, count, "instruction mix");
    }

    println!("{}", Report::capture(&computer));

    Ok(())
}

// stores 30 at 5, then loads the 4 sitting at 7
fn program() -> [i32; MEMORY_SIZE] {
    let mut ram = [0; MEMORY_SIZE];

    ram[0] = Instruction::Sta.value();
    ram[1] = 5;
    ram[2] = Instruction::Lda.value();
    ram[3] = 7;
    ram[4] = Instruction::Hlt.value();

    ram[7] = 4;

    ram
}
