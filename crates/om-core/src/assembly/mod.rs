pub mod assembler;
pub mod diversity;
