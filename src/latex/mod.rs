pub mod assembler;
pub mod facade;
