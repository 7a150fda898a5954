pub mod computer;
pub mod decoder;
