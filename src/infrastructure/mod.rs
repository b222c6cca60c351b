//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based chain RPC client
//! - ABI file loading and block-explorer ABI lookups

pub mod abi;
pub mod ethereum;
