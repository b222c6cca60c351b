//! Command modules
//!
//! Each module backs one `axe` subcommand and keeps its I/O at the edges:
//! - calldata: decode calldata from a transaction, an address or an ABI file
//! - constants: tables of frequently used EVM constants
//! - export: table, JSON and CSV rendering shared by the commands

pub mod calldata;
pub mod constants;
pub mod export;
