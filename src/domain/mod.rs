//! Domain layer - pure models with no I/O

pub mod abi;
