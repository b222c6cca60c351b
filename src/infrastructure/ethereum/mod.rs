//! Ethereum infrastructure - Alloy provider implementations

mod provider;

pub use provider::{ChainClient, HttpChainClient, RawTransaction};
